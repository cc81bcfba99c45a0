//! `index.html` listing every successfully built variant.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::build::BuildResult;

const STYLE: &str = "\
body { font-family: system-ui, sans-serif; max-width: 1200px; margin: 0 auto; padding: 2rem; }
.header { text-align: center; margin-bottom: 3rem; }
.cv-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 1.5rem; }
.cv-card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 1.5rem; }
.cv-title { font-size: 1.2rem; font-weight: 600; margin-bottom: 1rem; }
.cv-links { display: flex; gap: 0.5rem; flex-wrap: wrap; }
.cv-link { padding: 0.5rem 1rem; background: #3b82f6; color: white; text-decoration: none; border-radius: 4px; font-size: 0.875rem; }
.cv-link.json { background: #10b981; }
.cv-link.html { background: #f59e0b; }
.cv-link.pdf { background: #ef4444; }";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Link to an output file relative to the index, using forward slashes.
fn link(role: &str, path: &Path, class: &str, label: &str) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        r#"<a href="{}/{}" class="cv-link {class}">{label}</a>"#,
        escape_html(role),
        escape_html(&file_name)
    )
}

fn card(result: &BuildResult) -> String {
    let links: Vec<String> = [
        (&result.json_path, "json", "JSON"),
        (&result.facts_path, "json", "Facts"),
        (&result.letter_path, "json", "Letter"),
        (&result.html_path, "html", "HTML"),
        (&result.pdf_path, "pdf", "Resume PDF"),
        (&result.letter_pdf_path, "pdf", "Letter PDF"),
    ]
    .into_iter()
    .filter_map(|(path, class, label)| {
        path.as_deref()
            .map(|p| link(&result.role, p, class, label))
    })
    .collect();

    format!(
        r#"    <div class="cv-card">
      <div class="cv-title">{}</div>
      <div class="cv-links">{}</div>
    </div>"#,
        escape_html(&result.name),
        links.join("")
    )
}

/// Renders the index page. Failed variants are not listed.
pub fn render_index(results: &[BuildResult], generated_at: DateTime<Utc>) -> String {
    let successful: Vec<&BuildResult> = results.iter().filter(|r| r.success).collect();
    let cards: Vec<String> = successful.iter().map(|r| card(r)).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Systematic CV</title>
  <style>
{STYLE}
  </style>
</head>
<body>
  <div class="header">
    <h1>Systematic CV</h1>
    <p>{count} CV variants generated</p>
    <p><small>Built {timestamp}</small></p>
  </div>
  <div class="cv-grid">
{cards}
  </div>
</body>
</html>
"#,
        count = successful.len(),
        timestamp = generated_at.format("%Y-%m-%d %H:%M UTC"),
        cards = cards.join("\n"),
    )
}
