//! Message annotation pass.
//!
//! Computes the id and placeholder names of every `{msg}` in the registry
//! and stores them on the node. Must run before extraction. Running it
//! again is harmless: the algorithm is deterministic, so the stored values
//! are simply rewritten with themselves.

use crate::core::ast::{Node, NodeId};
use crate::core::msg::set_placeholders_and_id;
use crate::core::registry::Registry;
use crate::errors::{ExtractError, InvalidMessageError, MessageError};

pub fn annotate(registry: &mut Registry) -> Result<(), ExtractError> {
    for (name, entry) in registry.templates_mut() {
        let result = entry
            .node
            .body
            .iter_mut()
            .try_for_each(annotate_node);

        if let Err((node, err)) = result {
            return Err(InvalidMessageError {
                template: name.to_string(),
                file: entry.source_file().to_string(),
                line: entry.line_number(node).unwrap_or_default(),
                reason: err.reason,
            }
            .into());
        }
    }
    Ok(())
}

/// Pre-order walk. Message children are consumed by the id algorithm and
/// are not walked here.
fn annotate_node(node: &mut Node) -> Result<(), (NodeId, MessageError)> {
    match node {
        Node::Msg(msg) => set_placeholders_and_id(msg).map_err(|err| (msg.id, err)),
        other => match other.children_mut() {
            Some(children) => children.iter_mut().try_for_each(annotate_node),
            None => Ok(()),
        },
    }
}
