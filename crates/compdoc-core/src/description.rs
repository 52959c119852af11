//! Component descriptions from `<summary>` doc comments

use std::path::Path;
use std::sync::LazyLock;

use compdoc_fs::io::{file_type_of, read_text_bounded};
use regex::Regex;

/// Case-insensitive, spanning lines, shortest body.
static SUMMARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<summary>\s*(.*?)\s*</summary>").unwrap());

/// Body of the first `<summary>` block in `text`, trimmed.
///
/// The body is normalized on purpose: `///` markers are dropped and lines
/// spanning several doc-comment lines are joined with single spaces. An
/// empty first block still counts as the match and yields `Some("")`.
pub fn extract_summary(text: &str) -> Option<String> {
    SUMMARY
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_body(m.as_str()))
}

fn clean_body(body: &str) -> String {
    body.lines()
        .map(|line| line.trim().trim_start_matches("///").trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Description scanned from `files` in order, considering only `extensions`.
///
/// The first file holding a `<summary>` ends the scan; an empty body there
/// gives `None` so the caller falls back to [`default_description`]. Files
/// that cannot be read are skipped with a debug log.
pub fn describe(files: &[impl AsRef<Path>], extensions: &[String], limit: u64) -> Option<String> {
    files
        .iter()
        .map(AsRef::<Path>::as_ref)
        .filter(|path| {
            let ext = file_type_of(path);
            extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .find_map(|path| match read_text_bounded(path, limit) {
            Ok(text) => extract_summary(&text),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping file while scanning for summary");
                None
            }
        })
        .filter(|summary| !summary.is_empty())
}

/// Fallback when no summary exists.
pub fn default_description(component: &str) -> String {
    format!("{component} component")
}
