use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::constants::{THEMES, UPLOAD_FIELD};
use crate::modules::gallery::schema::GalleryEntry;
use crate::utils::Flash;

fn palette(theme: &str) -> (&'static str, &'static str, &'static str) {
    match theme {
        "darkly" => ("#222", "#eee", "#375a7f"),
        "cosmo" => ("#fff", "#373a3c", "#2780e3"),
        "sandstone" => ("#f8f5f0", "#3e3f3a", "#93c54b"),
        _ => ("#ecf0f1", "#2c3e50", "#18bc9c"),
    }
}

fn stylesheet(theme: &str) -> String {
    let (background, foreground, accent) = palette(theme);
    format!(
        "body{{background:{background};color:{foreground};font-family:sans-serif;margin:2em}}\
         a{{color:{accent}}}.success{{color:#2e7d32}}.danger{{color:#c62828}}\
         ul.gallery{{list-style:none;display:flex;flex-wrap:wrap;gap:1em;padding:0}}\
         .missing{{display:inline-block;width:150px}}"
    )
}

/// Gallery page: flash notice, upload form, then every original beside its thumbnail
pub fn render_index(entries: &[GalleryEntry], flash: Option<&Flash>, theme: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "Gallery" }
                style { (PreEscaped(stylesheet(theme))) }
            }
            body {
                h1 { "Gallery" }
                @if let Some(flash) = flash {
                    p class=(flash.level.as_str()) { (flash.message) }
                }
                form method="post" enctype="multipart/form-data" {
                    input type="file" name=(UPLOAD_FIELD) accept=".bmp,.gif,.png,.jpg,.jpeg";
                    button type="submit" { "Upload" }
                }
                p {
                    "Theme: "
                    @for (i, name) in THEMES.iter().enumerate() {
                        @if i > 0 { " | " }
                        a href={ "?theme=" (name) } { (name) }
                    }
                }
                @if entries.is_empty() {
                    p { "No images yet." }
                } @else {
                    ul.gallery {
                        @for entry in entries {
                            li { (gallery_item(entry)) }
                        }
                    }
                }
            }
        }
    }
}

fn gallery_item(entry: &GalleryEntry) -> Markup {
    let image_url = format!("/uploads/{}", urlencoding::encode(&entry.image));
    let thumbnail_url = entry
        .thumbnail
        .as_deref()
        .map(|thumb| format!("/thumbnails/{}", urlencoding::encode(thumb)));
    html! {
        a href=(image_url) {
            @if let Some(thumbnail_url) = thumbnail_url {
                img src=(thumbnail_url) alt=(entry.image);
            } @else {
                span.missing { "no thumbnail available" }
            }
        }
        br;
        small { (entry.image) }
    }
}
