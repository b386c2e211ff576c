//! Document ingestion: text to word sequence
//!
//! Flattens plain text and Markdown into the token list the engine plays.
//! Tokens keep their punctuation; whitespace is dropped. EPUB and PDF are
//! recognised by extension but rejected.

use std::path::Path;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use rsvp_common::{Error, Result};
use tracing::{debug, info};

use crate::playback::timing::PARAGRAPH_MARK;

/// Input format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Markdown,
    Epub,
    Pdf,
}

impl DocumentFormat {
    /// Format for `path`; unknown or missing extensions are plain text
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("md") | Some("markdown") => DocumentFormat::Markdown,
            Some("epub") => DocumentFormat::Epub,
            Some("pdf") => DocumentFormat::Pdf,
            _ => DocumentFormat::PlainText,
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::PlainText => write!(f, "plain text"),
            DocumentFormat::Markdown => write!(f, "markdown"),
            DocumentFormat::Epub => write!(f, "epub"),
            DocumentFormat::Pdf => write!(f, "pdf"),
        }
    }
}

/// Tokenizer switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizeOptions {
    /// Append a pilcrow to the last word of each paragraph except the final
    /// one, so the timing model pauses at paragraph breaks
    pub mark_paragraphs: bool,
}

/// Split text into words, paragraphs separated by blank lines
pub fn tokenize(text: &str, options: TokenizeOptions) -> Vec<String> {
    let mut words = Vec::new();
    let mut paragraph_ends = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if words.len() > paragraph_ends.last().copied().unwrap_or(0) {
                paragraph_ends.push(words.len());
            }
            continue;
        }
        words.extend(line.split_whitespace().map(str::to_string));
    }

    if options.mark_paragraphs {
        for &end in &paragraph_ends {
            if end < words.len() {
                words[end - 1].push(PARAGRAPH_MARK);
            }
        }
    }

    words
}

/// Reduce Markdown to its readable text.
///
/// Keeps the text of paragraphs, headings, list items, block quotes, table
/// cells, links and image alt text, plus inline code. Fenced and indented
/// code blocks, raw HTML and rules are dropped. Block ends become blank
/// lines so [`tokenize`] still sees paragraph breaks; list items and table
/// rows end with a single newline.
pub fn strip_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_code_block = false;

    for event in Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                out.push_str("\n\n");
            }
            Event::Text(chunk) | Event::Code(chunk) if !in_code_block => out.push_str(&chunk),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::End(TagEnd::TableCell) => out.push(' '),
            Event::End(TagEnd::Item | TagEnd::TableHead | TagEnd::TableRow) => out.push('\n'),
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::List(_) | TagEnd::Table,
            ) => out.push_str("\n\n"),
            _ => {}
        }
    }

    out
}

/// Tokenize `text` according to `format`
pub fn tokenize_document(
    text: &str,
    format: DocumentFormat,
    options: TokenizeOptions,
) -> Result<Vec<String>> {
    match format {
        DocumentFormat::PlainText => Ok(tokenize(text, options)),
        DocumentFormat::Markdown => Ok(tokenize(&strip_markdown(text), options)),
        DocumentFormat::Epub | DocumentFormat::Pdf => {
            Err(Error::UnsupportedFormat(format.to_string()))
        }
    }
}

/// Read and tokenize the document at `path`.
///
/// EPUB and PDF fail with [`Error::UnsupportedFormat`] before the file is
/// opened.
pub async fn load_document(path: &Path, options: TokenizeOptions) -> Result<Vec<String>> {
    let format = DocumentFormat::from_path(path);
    let text = match format {
        DocumentFormat::Epub | DocumentFormat::Pdf => String::new(),
        _ => {
            debug!("Reading {} as {}", path.display(), format);
            tokio::fs::read_to_string(path).await?
        }
    };

    let words = tokenize_document(&text, format, options)?;
    info!("Tokenized {} into {} words", path.display(), words.len());
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.txt")), DocumentFormat::PlainText);
        assert_eq!(DocumentFormat::from_path(Path::new("README")), DocumentFormat::PlainText);
        assert_eq!(DocumentFormat::from_path(Path::new("notes.MD")), DocumentFormat::Markdown);
        assert_eq!(DocumentFormat::from_path(Path::new("book.epub")), DocumentFormat::Epub);
        assert_eq!(DocumentFormat::from_path(Path::new("paper.pdf")), DocumentFormat::Pdf);
    }

    #[test]
    fn test_tokenize_keeps_punctuation() {
        let words = tokenize("Hello,  world!\nSecond\tline.", TokenizeOptions::default());
        assert_eq!(words, vec!["Hello,", "world!", "Second", "line."]);
    }

    #[test]
    fn test_paragraphs_unmarked_by_default() {
        let words = tokenize("One two.\n\nThree.", TokenizeOptions::default());
        assert_eq!(words, vec!["One", "two.", "Three."]);
    }

    #[test]
    fn test_mark_paragraphs() {
        let options = TokenizeOptions { mark_paragraphs: true };
        let words = tokenize("One two.\n\n\n  \nThree.\n\nFour.\n\n", options);
        assert_eq!(words, vec!["One", "two.¶", "Three.¶", "Four."]);
    }

    fn markdown_words(text: &str) -> Vec<String> {
        tokenize(&strip_markdown(text), TokenizeOptions::default())
    }

    #[test]
    fn test_strip_markdown_structure() {
        let text = "# Title\n\n> quoted *text*\n\n- item one\n- item two\n\n---\n\nAfter.\n";
        assert_eq!(
            markdown_words(text),
            vec!["Title", "quoted", "text", "item", "one", "item", "two", "After."]
        );
    }

    #[test]
    fn test_strip_markdown_inline() {
        assert_eq!(markdown_words("see [the docs](http://x.y/z) now"), vec!["see", "the", "docs", "now"]);
        assert_eq!(markdown_words("![a cat](cat.png)"), vec!["a", "cat"]);
        assert_eq!(
            markdown_words("`code` and __bold__ snake_case"),
            vec!["code", "and", "bold", "snake_case"]
        );
        assert_eq!(markdown_words("[not a link]"), vec!["[not", "a", "link]"]);
    }

    #[test]
    fn test_literal_asterisk_is_kept() {
        assert_eq!(markdown_words("Compute 3 * 4 now."), vec!["Compute", "3", "*", "4", "now."]);
    }

    #[test]
    fn test_escapes_are_resolved() {
        assert_eq!(
            markdown_words(r"Use \*literal\* and \_this\_ ok."),
            vec!["Use", "*literal*", "and", "_this_", "ok."]
        );
    }

    #[test]
    fn test_link_target_with_parentheses() {
        assert_eq!(
            markdown_words("Read [wiki](https://en.wikipedia.org/wiki/Rust_(language)) ok."),
            vec!["Read", "wiki", "ok."]
        );
    }

    #[test]
    fn test_code_blocks_are_skipped() {
        let text = "Before.\n\n```rust\nfn main() {}\n```\n\n    indented();\n\nAfter.\n";
        assert_eq!(markdown_words(text), vec!["Before.", "After."]);
    }

    #[test]
    fn test_tables_read_cell_text() {
        let text = "| a | b |\n|---|---|\n| one | two |\n";
        assert_eq!(markdown_words(text), vec!["a", "b", "one", "two"]);
    }

    #[test]
    fn test_hashtag_is_not_heading() {
        assert_eq!(markdown_words("#hashtag"), vec!["#hashtag"]);
        assert_eq!(markdown_words("## Two"), vec!["Two"]);
    }

    #[test]
    fn test_markdown_blocks_mark_paragraphs() {
        let text = "# Title\n\nBody text.\n\n- a\n- b\n\nEnd.\n";
        let words = tokenize(&strip_markdown(text), TokenizeOptions { mark_paragraphs: true });
        assert_eq!(words, vec!["Title¶", "Body", "text.¶", "a", "b¶", "End."]);
    }

    #[test]
    fn test_unsupported_formats() {
        let result = tokenize_document("x", DocumentFormat::Epub, TokenizeOptions::default());
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }
}
