pub mod report;

use serde::Serialize;

use crate::api::{self, PhotoDetail, PhotoSummary};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Xml,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".xml") {
        return Some(OutputFormat::Xml);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct PhotoRecord {
    pub id: String,
    pub author: String,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub download_url: String,
    pub thumbnail_url: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct GalleryReport {
    pub photos: Vec<PhotoRecord>,
    pub last_page: u32,
    pub exhausted: bool,
}

pub fn build_gallery_report(
    base_url: &str,
    photos: &[PhotoSummary],
    last_page: u32,
    exhausted: bool,
) -> GalleryReport {
    let photos = photos
        .iter()
        .map(|p| PhotoRecord {
            id: p.id.clone(),
            author: p.author.clone(),
            width: p.width,
            height: p.height,
            url: p.url.clone(),
            download_url: p.download_url.clone(),
            thumbnail_url: api::thumbnail_url(base_url, &p.id),
        })
        .collect();
    GalleryReport {
        photos,
        last_page,
        exhausted,
    }
}

pub fn render_gallery(format: OutputFormat, report: &GalleryReport) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_gallery_text(report),
        OutputFormat::Json => {
            serde_json::to_vec_pretty(report).unwrap_or_else(|_| b"{}\n".to_vec())
        }
        OutputFormat::Xml => render_gallery_xml(report),
        OutputFormat::Html => report::render_gallery_html(report),
    }
}

pub fn render_detail(format: OutputFormat, photo: Option<&PhotoDetail>) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_detail_text(photo),
        OutputFormat::Json => {
            serde_json::to_vec_pretty(&photo).unwrap_or_else(|_| b"null\n".to_vec())
        }
        OutputFormat::Xml => render_detail_xml(photo),
        OutputFormat::Html => report::render_detail_html(photo),
    }
}

fn render_gallery_text(report: &GalleryReport) -> Vec<u8> {
    let mut out = String::new();
    for p in &report.photos {
        out.push_str(&format!(
            "{}\t{}\t{}x{}\t{}\n",
            p.id, p.author, p.width, p.height, p.url
        ));
    }
    out.into_bytes()
}

pub fn detail_description(photo: &PhotoDetail) -> String {
    format!(
        "This is a stunning photograph captured by {}. The original dimensions of this image are {}x{} pixels.",
        photo.author, photo.width, photo.height
    )
}

fn render_detail_text(photo: Option<&PhotoDetail>) -> Vec<u8> {
    let Some(photo) = photo else {
        return b"Photo not found.\n".to_vec();
    };
    let mut out = String::new();
    out.push_str(&format!("The Beauty of Nature #{}\n", photo.id));
    out.push_str(&format!("By: {}\n\n", photo.author));
    out.push_str(&detail_description(photo));
    out.push_str("\n\n");
    out.push_str(&format!("Image:  {}\n", photo.download_url));
    out.push_str(&format!("Source: {}\n", photo.url));
    out.into_bytes()
}

pub(crate) fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn push_photo_xml(out: &mut String, indent: &str, tag: &str, p: &PhotoRecord) {
    out.push_str(&format!("{indent}<{tag} id=\"{}\">\n", escape_xml(&p.id)));
    out.push_str(&format!(
        "{indent}  <author>{}</author>\n",
        escape_xml(&p.author)
    ));
    out.push_str(&format!("{indent}  <width>{}</width>\n", p.width));
    out.push_str(&format!("{indent}  <height>{}</height>\n", p.height));
    out.push_str(&format!("{indent}  <url>{}</url>\n", escape_xml(&p.url)));
    out.push_str(&format!(
        "{indent}  <download_url>{}</download_url>\n",
        escape_xml(&p.download_url)
    ));
    if !p.thumbnail_url.is_empty() {
        out.push_str(&format!(
            "{indent}  <thumbnail_url>{}</thumbnail_url>\n",
            escape_xml(&p.thumbnail_url)
        ));
    }
    out.push_str(&format!("{indent}</{tag}>\n"));
}

fn render_gallery_xml(report: &GalleryReport) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str(&format!(
        "<gallery last_page=\"{}\" exhausted=\"{}\">\n",
        report.last_page, report.exhausted
    ));
    for p in &report.photos {
        push_photo_xml(&mut out, "  ", "photo", p);
    }
    out.push_str("</gallery>\n");
    out.into_bytes()
}

fn render_detail_xml(photo: Option<&PhotoDetail>) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    match photo {
        Some(p) => {
            let record = PhotoRecord {
                id: p.id.clone(),
                author: p.author.clone(),
                width: p.width,
                height: p.height,
                url: p.url.clone(),
                download_url: p.download_url.clone(),
                thumbnail_url: String::new(),
            };
            push_photo_xml(&mut out, "", "photo", &record);
        }
        None => out.push_str("<photo/>\n"),
    }
    out.into_bytes()
}
