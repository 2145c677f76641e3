use super::{detail_description, escape_xml, GalleryReport};
use crate::api::PhotoDetail;

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

fn page(title: &str, data: &str, body: &str) -> String {
    format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title}</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 text-gray-900 min-h-screen">
  <script type="application/json" id="photos-data">{data}</script>
{body}
</body>
</html>
"####,
        title = escape_xml(title),
    )
}

fn render_card(photo: &super::PhotoRecord) -> String {
    format!(
        r#"      <div class="photo-card" id="photo-{id}">
        <a href="{url}" class="block group h-full border rounded-lg overflow-hidden shadow-md hover:shadow-xl transition-shadow duration-300">
          <div class="relative aspect-square overflow-hidden bg-gray-200">
            <img src="{thumb}" alt="{author}" width="300" height="300" loading="lazy" class="w-full h-full object-cover group-hover:scale-110 transition-transform duration-300"/>
          </div>
          <div class="p-4 bg-white">
            <p class="text-sm font-semibold text-green-500">Author</p>
            <h3 class="text-lg font-black text-black truncate">{author}</h3>
          </div>
        </a>
      </div>
"#,
        id = escape_xml(&photo.id),
        url = escape_xml(&photo.download_url),
        thumb = escape_xml(&photo.thumbnail_url),
        author = escape_xml(&photo.author),
    )
}

pub fn render_gallery_html(report: &GalleryReport) -> Vec<u8> {
    let json = serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string());
    let json = json_for_script_tag(&json);

    let mut body = String::new();
    body.push_str("  <div class=\"container mx-auto p-4\">\n");
    body.push_str(
        "    <h1 class=\"text-3xl font-bold mb-6 text-center\">Lorem Picsum Gallery</h1>\n",
    );
    body.push_str("    <div class=\"grid grid-cols-1 sm:grid-cols-2 md:grid-cols-3 lg:grid-cols-4 gap-6\">\n");
    for photo in &report.photos {
        body.push_str(&render_card(photo));
    }
    body.push_str("    </div>\n");
    if report.exhausted {
        body.push_str(
            "    <div class=\"text-center py-4 text-gray-500\">You have reached the end of the list.</div>\n",
        );
    }
    body.push_str("  </div>");

    page("Lorem Picsum Gallery", &json, &body).into_bytes()
}

pub fn render_detail_html(photo: Option<&PhotoDetail>) -> Vec<u8> {
    let json = serde_json::to_string(&photo).unwrap_or_else(|_| "null".to_string());
    let json = json_for_script_tag(&json);

    let Some(photo) = photo else {
        let body = "  <div class=\"text-center mt-10\">Photo not found.</div>";
        return page("Photo not found", &json, body).into_bytes();
    };

    let body = format!(
        r#"  <div class="container mx-auto p-4 max-w-4xl">
    <div class="bg-white rounded-xl shadow-lg overflow-hidden">
      <div class="relative w-full aspect-video bg-gray-100">
        <img src="{download_url}" alt="{author}" class="w-full h-full object-contain"/>
      </div>
      <div class="p-6">
        <div class="mb-4">
          <h1 class="text-3xl font-bold text-gray-800 mb-2">The Beauty of Nature #{id}</h1>
          <p class="text-md text-gray-500 font-medium">By: <span class="text-blue-600">{author}</span></p>
        </div>
        <div class="prose max-w-none text-gray-700">
          <h3 class="text-xl font-semibold mb-2">Description</h3>
          <p>{description}</p>
          <div class="mt-4 pt-4 border-t">
            <a href="{url}" target="_blank" rel="noreferrer" class="text-sm text-blue-500 hover:text-blue-700">View on Unsplash / Source</a>
          </div>
        </div>
      </div>
    </div>
  </div>"#,
        download_url = escape_xml(&photo.download_url),
        author = escape_xml(&photo.author),
        id = escape_xml(&photo.id),
        description = escape_xml(&detail_description(photo)),
        url = escape_xml(&photo.url),
    );

    page(&format!("Photo #{}", photo.id), &json, &body).into_bytes()
}
