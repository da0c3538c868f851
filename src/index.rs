//! HTML index generation.
//!
//! Writes one static page listing every generated image, in generation
//! order. Each entry links to the image by its relative path and shows the
//! absolute URL the image has on the published mirror:
//!
//! ```html
//! <li><a href="images/100x100.jpg">https://…/placeholder-generator/images/100x100.jpg</a></li>
//! ```
//!
//! The page is rebuilt from scratch on every run. Markup is generated with
//! [maud](https://maud.lambda.xyz/), so filenames are escaped automatically.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Where the generated images are published.
pub const DEFAULT_BASE_URL: &str = "https://greggman.github.io/placeholder-generator";
pub const DEFAULT_TITLE: &str = "placeholders";
pub const DEFAULT_INDEX_FILE: &str = "index.html";

const STYLE: &str = r#"
:root {
  color-scheme: light dark;
}
body {
  font-family: monospace;
}
"#;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to write index {}: {source}", .path.display())]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Absolute mirror URL for a relative image path.
pub fn mirror_url(base_url: &str, filename: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        filename.trim_start_matches('/')
    )
}

/// Render the index page.
pub fn render_index(title: &str, base_url: &str, filenames: &[String]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0, user-scalable=yes";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { (title) }
                ul {
                    @for filename in filenames {
                        li {
                            a href=(filename) { (mirror_url(base_url, filename)) }
                        }
                    }
                }
            }
        }
    }
}

/// Render the index page and write it to `path`, replacing any existing file.
pub fn write_index(
    path: &Path,
    title: &str,
    base_url: &str,
    filenames: &[String],
) -> Result<(), IndexError> {
    let page = render_index(title, base_url, filenames);
    fs::write(path, page.into_string()).map_err(|source| IndexError::Write {
        path: path.to_path_buf(),
        source,
    })
}
