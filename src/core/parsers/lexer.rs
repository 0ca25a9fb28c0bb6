//! Splits template source into raw text runs and `{...}` tags.
//!
//! Comments are dropped here: `/* ... */` anywhere outside a tag, and `//`
//! to end of line when it starts a line or follows whitespace (so that
//! `http://` in text survives).

/// A lexical token with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub pos: usize,
    pub kind: TokenKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Raw text between tags, whitespace untouched.
    Text(String),
    /// Tag content between the braces, trimmed.
    Tag(String),
}

/// Lexing failure with the byte offset it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub pos: usize,
    pub message: String,
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < source.len() {
        let rest = &source[i..];

        if rest.starts_with("/*") {
            let end = rest.find("*/").ok_or_else(|| LexError {
                pos: i,
                message: "unterminated comment".to_string(),
            })?;
            i += end + 2;
            continue;
        }

        if rest.starts_with("//") && starts_line_comment(source, i) {
            i += rest.find('\n').unwrap_or(rest.len());
            continue;
        }

        if rest.starts_with('{') {
            flush_text(&mut tokens, &mut text, text_start);
            let len = tag_len(rest).ok_or_else(|| LexError {
                pos: i,
                message: "unterminated tag".to_string(),
            })?;
            tokens.push(Token {
                pos: i,
                kind: TokenKind::Tag(rest[1..len - 1].trim().to_string()),
            });
            i += len;
            text_start = i;
            continue;
        }

        if rest.starts_with('}') {
            return Err(LexError {
                pos: i,
                message: "unexpected '}' in text, use {rb}".to_string(),
            });
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        if text.is_empty() {
            text_start = i;
        }
        text.push(c);
        i += c.len_utf8();
    }

    flush_text(&mut tokens, &mut text, text_start);
    Ok(tokens)
}

fn flush_text(tokens: &mut Vec<Token>, text: &mut String, start: usize) {
    if !text.is_empty() {
        tokens.push(Token {
            pos: start,
            kind: TokenKind::Text(std::mem::take(text)),
        });
    }
}

fn starts_line_comment(source: &str, pos: usize) -> bool {
    source[..pos]
        .chars()
        .next_back()
        .is_none_or(char::is_whitespace)
}

/// Length in bytes of the tag at the start of `rest`, braces included.
///
/// Braces inside quoted attribute values do not close the tag.
fn tag_len(rest: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in rest.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '{') => return None,
            (None, '}') => return Some(i + 1),
            (None, _) => {}
        }
    }
    None
}
