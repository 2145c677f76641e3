pub fn parse_header(value: &str) -> Result<(String, String), String> {
    let raw = value.trim();
    let (key, val) = raw
        .split_once(':')
        .ok_or_else(|| "expected format 'Key: Value'".to_string())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("header name is empty".to_string());
    }
    if key.chars().any(|c| c.is_whitespace()) {
        return Err(format!("invalid header name '{key}'"));
    }
    Ok((key.to_string(), val.trim().to_string()))
}

pub fn normalize_base_url(value: &str) -> Result<String, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("base URL is empty".to_string());
    }
    let parsed = reqwest::Url::parse(raw).map_err(|e| format!("{e}"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{other}'")),
    }
    if parsed.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if parsed.query().is_some() {
        return Err("base URL must not carry a query".to_string());
    }
    Ok(raw.trim_end_matches('/').to_string())
}

pub fn is_valid_photo_id(value: &str) -> bool {
    let id = value.trim();
    !id.is_empty() && !id.contains('/') && !id.chars().any(|c| c.is_whitespace())
}
