use super::severity::Severity;
use super::Report;
use crate::model::LogEntry;
use chrono::{DateTime, Utc};

/// Shown in place of a missing timestamp or message
pub const PLACEHOLDER: &str = "---";

pub const EMPTY_NOTICE: &str = "No log events found for this stream.";

const STYLESHEET: &str = r#"    @import url('https://fonts.googleapis.com/css2?family=Lato:wght@400;700&family=Roboto+Mono:wght@400&display=swap');
    :root { --color-bg: #1a1a2e; --color-bg-light: #2a2a3e; --color-bg-hover: #3a3a4e; --color-border: #444; --color-text: #e0e0e0; --color-text-dim: #9e9e9e; --color-primary: #007bff; --color-primary-dark: #0056b3; --color-error-bg: #5d2b2b; --color-error-text: #ffdddd; --color-warn-bg: #5d512b; --color-warn-text: #ffffdd; }
    body { font-family: 'Lato', Arial, sans-serif; font-weight: 400; background-color: var(--color-bg); color: var(--color-text); margin: 0; padding: 20px; -webkit-font-smoothing: antialiased; }
    .container { max-width: 1400px; margin: 20px auto; padding: 24px; background-color: var(--color-bg-light); border-radius: 12px; box-shadow: 0 10px 25px rgba(0,0,0,0.5); border: 1px solid var(--color-border); }
    .header { display: flex; align-items: center; gap: 15px; border-bottom: 2px solid var(--color-primary); padding-bottom: 15px; }
    .header svg { width: 40px; height: 40px; fill: var(--color-primary); }
    h1 { color: var(--color-primary); margin: 0; font-size: 2.25rem; font-weight: 700; }
    .meta-info { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 15px 25px; background-color: var(--color-bg); padding: 20px; border-radius: 8px; margin: 25px 0; }
    .meta-item { font-size: 1.1em; }
    .meta-item strong { color: #009bff; display: block; font-size: 0.9em; text-transform: uppercase; letter-spacing: 0.5px; margin-bottom: 5px; font-weight: 700; }
    .table-container { width: 100%; overflow-x: auto; }
    table { border-collapse: collapse; width: 100%; margin-top: 20px; }
    th, td { border: 1px solid var(--color-border); padding: 12px 15px; text-align: left; vertical-align: top; }
    th { background-color: var(--color-primary-dark); color: white; position: sticky; top: 0; font-size: 1.1em; font-weight: 700; }
    tr:nth-child(even) { background-color: #31314a; }
    tr:hover { background-color: var(--color-bg-hover); }
    td.timestamp { width: 220px; font-family: 'Roboto Mono', monospace; color: var(--color-text-dim); }
    td.message { white-space: pre-wrap; word-break: break-word; }
    td.empty { text-align: center; padding: 20px; }
    .log-error { background-color: var(--color-error-bg); color: var(--color-error-text); }
    .log-warning { background-color: var(--color-warn-bg); color: var(--color-warn-text); }
    .log-error .timestamp { color: #ffb8b8; }
    .log-warning .timestamp { color: #ffffb8; }
"#;

const HEADER_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M13 9h5.5L13 3.5V9M6 2h8l6 6v12a2 2 0 0 1-2 2H6a2 2 0 0 1-2-2V4a2 2 0 0 1 2-2m4 9H8v2h2v-2m4 0h-2v2h2v-2m0 4h-2v2h2v-2m-4-4H8v2h2v-2Z"/></svg>"#;

/// Render entries into a self-contained HTML report.
///
/// Pure: the same inputs and `now` always produce the same document. Entry
/// order and text are kept as given; severity only picks the row style.
pub fn render(title: &str, category: &str, entries: &[LogEntry], now: DateTime<Utc>) -> Report {
    let title_html = escape_html(title);
    let category_html = escape_html(category);
    let generated = format!("{} UTC", now.format("%Y-%m-%d %H:%M:%S"));

    let mut out = String::with_capacity(8 * 1024 + entries.len() * 160);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("  <meta charset=\"UTF-8\">\n");
    out.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str(&format!("  <title>Log Report: {}</title>\n", title_html));
    out.push_str("  <style>\n");
    out.push_str(STYLESHEET);
    out.push_str("  </style>\n</head>\n<body>\n  <div class=\"container\">\n");

    out.push_str("    <div class=\"header\">\n      ");
    out.push_str(HEADER_ICON);
    out.push_str("\n      <h1>Log Report</h1>\n    </div>\n");

    out.push_str("    <div class=\"meta-info\">\n");
    push_meta(&mut out, "Function", &title_html);
    push_meta(&mut out, "Category", &category_html);
    push_meta(&mut out, "Generated", &generated);
    push_meta(&mut out, "Events Found", &entries.len().to_string());
    out.push_str("    </div>\n");

    out.push_str("    <div class=\"table-container\">\n      <table>\n        <thead>\n");
    out.push_str("          <tr><th>Timestamp (UTC)</th><th>Message</th></tr>\n");
    out.push_str("        </thead>\n        <tbody>\n");

    if entries.is_empty() {
        out.push_str(&format!(
            "          <tr><td class=\"empty\" colspan=\"2\">{}</td></tr>\n",
            EMPTY_NOTICE
        ));
    } else {
        for entry in entries {
            push_row(&mut out, entry);
        }
    }

    out.push_str("        </tbody>\n      </table>\n    </div>\n  </div>\n</body>\n</html>\n");

    Report {
        title: title.to_string(),
        category: category.to_string(),
        generated_at: now,
        entry_count: entries.len(),
        body: out,
    }
}

fn push_meta(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(
        "      <div class=\"meta-item\"><strong>{}:</strong> {}</div>\n",
        label, value
    ));
}

fn push_row(out: &mut String, entry: &LogEntry) {
    let timestamp = entry
        .timestamp
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let message = entry.message.as_deref().unwrap_or(PLACEHOLDER);
    let severity = Severity::classify(message);

    out.push_str(&format!("          <tr class=\"{}\">\n", severity.css_class()));
    out.push_str(&format!("            <td class=\"timestamp\">{}</td>\n", timestamp));
    out.push_str(&format!(
        "            <td class=\"message\">{}</td>\n",
        escape_html(message)
    ));
    out.push_str("          </tr>\n");
}

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
