//! Text extraction from plain text and markdown documents

use crate::error::Result;
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(normalize_line_endings(&content))
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&normalize_line_endings(&markdown_content)))
    }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Render markdown as plain text.
///
/// Top-level blocks that were separated by a blank line in the source stay
/// separated by one, so "Required:" / "Nice to have:" sections keep their
/// paragraph boundaries. List items become "- item" lines.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut out = String::new();
    let mut depth = 0usize;

    for (event, range) in Parser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    push_block_separator(&mut out, &markdown[..range.start]);
                } else if is_nested_block(&tag) && !out.ends_with('\n') && !out.ends_with(' ') {
                    out.push(if matches!(tag, Tag::Paragraph) { ' ' } else { '\n' });
                }
                if let Tag::Item = tag {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str("- ");
                }
                depth += 1;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Rule => push_block_separator(&mut out, &markdown[..range.start]),
            _ => {}
        }
    }

    out.trim().to_string()
}

fn is_nested_block(tag: &Tag) -> bool {
    matches!(
        tag,
        Tag::Paragraph | Tag::Heading(..) | Tag::BlockQuote | Tag::CodeBlock(_) | Tag::List(_)
    )
}

fn push_block_separator(out: &mut String, preceding_source: &str) {
    if out.is_empty() {
        return;
    }
    let gap = &preceding_source[preceding_source.trim_end().len()..];
    let separator = if gap.matches('\n').count() >= 2 { "\n\n" } else { "\n" };
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out.push_str(separator);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_markdown_keeps_paragraph_breaks() {
        let markdown = "# Senior Engineer\n\nRequired:\n- Rust\n- Go\n\nNice to have:\n- Python\n";
        let text = markdown_to_text(markdown);
        assert_eq!(text, "Senior Engineer\n\nRequired:\n- Rust\n- Go\n\nNice to have:\n- Python");
    }

    #[test]
    fn test_markdown_inline_formatting_is_dropped() {
        let text = markdown_to_text("Expert in **Rust** and `tokio` &amp; [Kafka](https://kafka.apache.org).");
        assert_eq!(text, "Expert in Rust and tokio & Kafka.");
    }

    #[test]
    fn test_markdown_loose_list_items_stay_on_their_lines() {
        let text = markdown_to_text("- Docker\n\n- Kubernetes\n");
        assert_eq!(text, "- Docker\n- Kubernetes");
    }

    #[tokio::test]
    async fn test_plain_text_normalizes_line_endings() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Required:\r\nRust\r\n\r\nPreferred:\r\nGo").unwrap();

        let text = PlainTextExtractor.extract(file.path()).await.unwrap();
        assert_eq!(text, "Required:\nRust\n\nPreferred:\nGo");
    }
}
