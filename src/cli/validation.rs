use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.id.as_deref() {
        if !crate::utils::is_valid_photo_id(raw) {
            return Err(format!("invalid --id '{raw}', expected a single path segment"));
        }
    }
    if let Some(raw) = args.base_url.as_deref() {
        crate::utils::normalize_base_url(raw)
            .map_err(|e| format!("invalid --base-url '{raw}': {e}"))?;
    }
    if let Some(raw) = args.header.as_deref() {
        crate::utils::parse_header(raw).map_err(|e| format!("invalid --header '{raw}': {e}"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json, xml, or html"
            ));
        }
    }
    if args.interactive && args.id.is_some() {
        return Err("--interactive has no effect with --id".to_string());
    }
    Ok(())
}
