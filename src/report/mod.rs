pub mod render;
pub mod severity;

pub use render::{escape_html, render, EMPTY_NOTICE, PLACEHOLDER};
pub use severity::Severity;

use chrono::{DateTime, Utc};

pub const CONTENT_TYPE: &str = "text/html";

/// A rendered log report. Built once by [`render`] and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub category: String,
    pub generated_at: DateTime<Utc>,
    pub entry_count: usize,
    pub body: String,
}

impl Report {
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    /// Object key for this report: `<prefix>/<title>-<yyyyMMddHHmmssSSS>.html`
    pub fn storage_key(&self, prefix: &str) -> String {
        let stamp = self.generated_at.format("%Y%m%d%H%M%S%3f");
        let name = sanitize_key_segment(&self.title);
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{}-{}.html", name, stamp)
        } else {
            format!("{}/{}-{}.html", prefix, name, stamp)
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body.into_bytes()
    }
}

/// Keep keys to a conservative character set so titles cannot add path segments
fn sanitize_key_segment(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "report".to_string()
    } else {
        cleaned
    }
}
