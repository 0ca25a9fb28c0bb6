use sha2::{Digest, Sha256};

use crate::core::ast::{CaseValue, MsgNode, Node, Placeholders};
use crate::core::msg::placeholders::FALLBACK_PLACEHOLDER;
use crate::errors::MessageError;

const MEANING_SEPARATOR: char = '\u{1f}';

/// Compute the stable numeric id of a message.
///
/// The id is the first 8 bytes (big-endian, top bit cleared) of a SHA-256
/// over the canonical message content: text runs, placeholder names,
/// plural/select structure, then the meaning. The description does not
/// contribute, so rewording it keeps existing translations.
pub fn compute_id(msg: &MsgNode, placeholders: &Placeholders) -> Result<u64, MessageError> {
    let mut canonical = String::new();
    write_parts(&msg.body, placeholders, &mut canonical)?;
    canonical.push(MEANING_SEPARATOR);
    canonical.push_str(&msg.meaning);

    let digest = Sha256::digest(canonical.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    Ok(u64::from_be_bytes(bytes) & (u64::MAX >> 1))
}

fn write_parts(nodes: &[Node], placeholders: &Placeholders, out: &mut String) -> Result<(), MessageError> {
    for node in nodes {
        match node {
            Node::Text(text) => {
                for c in text.text.chars() {
                    if matches!(c, '{' | '}' | '\\') {
                        out.push('\\');
                    }
                    out.push(c);
                }
            }
            Node::Print(print) => {
                let name = placeholders
                    .get(&print.id)
                    .map_or(FALLBACK_PLACEHOLDER, String::as_str);
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
            Node::Plural(plural) => {
                out.push_str("{PLURAL ");
                out.push_str(&plural.var_name);
                write_cases(&plural.cases, "plural", placeholders, out)?;
            }
            Node::Select(select) => {
                out.push_str("{SELECT ");
                out.push_str(&select.expr.text);
                write_cases(&select.cases, "select", placeholders, out)?;
            }
            other => {
                if let Some(children) = other.children() {
                    write_parts(children, placeholders, out)?;
                }
            }
        }
    }
    Ok(())
}

fn write_cases(
    cases: &[Node],
    construct: &str,
    placeholders: &Placeholders,
    out: &mut String,
) -> Result<(), MessageError> {
    let has_default = matches!(
        cases.last(),
        Some(Node::Case(case)) if case.value == CaseValue::Default
    );
    if !has_default {
        return Err(MessageError::new(format!(
            "{{{}}} is missing a {{default}} case",
            construct
        )));
    }

    for node in cases {
        if let Node::Case(case) = node {
            out.push('|');
            out.push_str(&case.value.to_string());
            out.push(':');
            write_parts(&case.body, placeholders, out)?;
        }
    }
    out.push('}');
    Ok(())
}
