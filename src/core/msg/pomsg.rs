//! PO-format view of a message: validation and msgid linearization.

use crate::core::ast::{CaseValue, MsgNode, Node, NodeKind, PluralNode};
use crate::core::msg::placeholders::base_placeholder_name;
use crate::errors::MessageError;

/// Check that a message can be represented as a PO entry.
///
/// - a plural must be the only child of the message
/// - its cases must be exactly `{case 1}` followed by `{default}`
/// - select is not supported, and plurals do not nest
/// - the msgid, and each plural branch, has some text
pub fn validate(msg: &MsgNode) -> Result<(), MessageError> {
    for (index, node) in msg.body.iter().enumerate() {
        match node {
            Node::Plural(plural) => {
                if index != 0 || msg.body.len() != 1 {
                    return Err(MessageError::new(
                        "{plural} must be the only child of {msg}",
                    ));
                }
                return validate_plural(msg, plural);
            }
            Node::Select(_) => {
                return Err(MessageError::new("{select} is not supported in PO catalogs"));
            }
            _ => {}
        }
    }
    if linearize(msg, &msg.body).is_empty() {
        return Err(MessageError::new("{msg} has no translatable text"));
    }
    Ok(())
}

fn validate_plural(msg: &MsgNode, plural: &PluralNode) -> Result<(), MessageError> {
    let values: Vec<&CaseValue> = plural
        .cases
        .iter()
        .filter_map(|node| match node {
            Node::Case(case) => Some(&case.value),
            _ => None,
        })
        .collect();
    if values != [&CaseValue::Int(1), &CaseValue::Default] {
        return Err(MessageError::new(
            "{plural} must have exactly a {case 1} and a {default} case",
        ));
    }

    for case in &plural.cases {
        if let Some(kind) = find_nested_switch(case.children().unwrap_or_default()) {
            return Err(MessageError::new(format!(
                "{{{}}} may not be nested inside {{plural}}",
                kind
            )));
        }
    }

    for node in &plural.cases {
        if let Node::Case(case) = node
            && linearize(msg, &case.body).is_empty()
        {
            let label = match case.value {
                CaseValue::Default => "{default}".to_string(),
                ref value => format!("{{case {}}}", value),
            };
            return Err(MessageError::new(format!("{} of {{plural}} is empty", label)));
        }
    }
    Ok(())
}

fn find_nested_switch(nodes: &[Node]) -> Option<NodeKind> {
    nodes.iter().find_map(|node| match node {
        Node::Plural(_) | Node::Select(_) => Some(node.kind()),
        other => other.children().and_then(find_nested_switch),
    })
}

/// The singular msgid: the `{case 1}` body of a plural message, otherwise
/// the whole body.
pub fn msgid(msg: &MsgNode) -> String {
    match msg.plural() {
        Some(plural) => plural_case_text(msg, plural, |v| *v == CaseValue::Int(1)),
        None => linearize(msg, &msg.body),
    }
}

/// The `{default}` body of a plural message; empty for other messages.
pub fn msgid_plural(msg: &MsgNode) -> String {
    match msg.plural() {
        Some(plural) => plural_case_text(msg, plural, |v| *v == CaseValue::Default),
        None => String::new(),
    }
}

fn plural_case_text(msg: &MsgNode, plural: &PluralNode, pick: impl Fn(&CaseValue) -> bool) -> String {
    plural
        .cases
        .iter()
        .find_map(|node| match node {
            Node::Case(case) if pick(&case.value) => Some(linearize(msg, &case.body)),
            _ => None,
        })
        .unwrap_or_default()
}

/// Render nodes as translator-facing text: literals verbatim, prints as
/// `{PLACEHOLDER}`.
fn linearize(msg: &MsgNode, nodes: &[Node]) -> String {
    let mut out = String::new();
    write_linear(msg, nodes, &mut out);
    out
}

fn write_linear(msg: &MsgNode, nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(&text.text),
            Node::Print(print) => {
                let name = msg
                    .placeholders
                    .as_ref()
                    .and_then(|p| p.get(&print.id).cloned())
                    .unwrap_or_else(|| base_placeholder_name(print));
                out.push('{');
                out.push_str(&name);
                out.push('}');
            }
            Node::Plural(_) | Node::Select(_) => {
                // Nested switches are rejected by `validate`; fall back to the default branch.
                if let Some(Node::Case(case)) = node.children().and_then(<[Node]>::last) {
                    write_linear(msg, &case.body, out);
                }
            }
            other => {
                if let Some(children) = other.children() {
                    write_linear(msg, children, out);
                }
            }
        }
    }
}
