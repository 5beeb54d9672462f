const ELLIPSIS: &str = "...";
pub const SOURCE_PREVIEW_CHARS: usize = 100;

/// First `SOURCE_PREVIEW_CHARS` characters of a source snippet followed by an ellipsis.
pub fn source_preview(text: &str) -> String {
    let end = text
        .char_indices()
        .nth(SOURCE_PREVIEW_CHARS)
        .map_or(text.len(), |(idx, _)| idx);
    format!("{}{ELLIPSIS}", &text[..end])
}

pub fn sources_block(sources: &[String]) -> Option<String> {
    if sources.is_empty() {
        return None;
    }
    let mut block = format!("📚 Sources ({}):", sources.len());
    for source in sources {
        block.push_str("\n• ");
        block.push_str(&source_preview(source));
    }
    Some(block)
}

pub fn format_file_info(name: &str, size_bytes: u64) -> String {
    format!("Selected: {name} ({:.2} KB)", size_bytes as f64 / 1024.0)
}
