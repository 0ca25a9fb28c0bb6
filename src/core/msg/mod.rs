//! Message algorithms: placeholder naming, id fingerprinting, and the PO
//! view (validation and msgid linearization).

pub mod fingerprint;
pub mod placeholders;
pub mod pomsg;

use crate::core::ast::MsgNode;
use crate::errors::MessageError;

pub use fingerprint::compute_id;
pub use placeholders::compute_placeholders;

/// Compute and store the placeholder names and id of a message.
///
/// Deterministic: running it again on the same node stores the same values.
/// On failure the node is left untouched.
pub fn set_placeholders_and_id(msg: &mut MsgNode) -> Result<(), MessageError> {
    let placeholders = compute_placeholders(msg);
    let id = compute_id(msg, &placeholders)?;
    msg.placeholders = Some(placeholders);
    msg.msg_id = Some(id);
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::ast::Node;
    use crate::core::parsers::parse_file;

    /// Parse a single message with the given `{msg}` attributes and body.
    pub fn parse_msg_with(attributes: &str, body: &str) -> MsgNode {
        let source = format!(
            "{{namespace test}}{{template .t}}{{msg {}}}{}{{/msg}}{{/template}}",
            attributes, body
        );
        let file = parse_file("test.soy", &source).unwrap();
        match file.nodes.into_iter().nth(1) {
            Some(Node::Template(template)) => match template.body.into_iter().next() {
                Some(Node::Msg(msg)) => msg,
                other => panic!("expected msg, got {:?}", other),
            },
            other => panic!("expected template, got {:?}", other),
        }
    }

    pub fn parse_msg(body: &str) -> MsgNode {
        parse_msg_with(r#"desc="test""#, body)
    }

    #[test]
    fn test_set_placeholders_and_id() {
        let mut msg = parse_msg("Hi {$name}");
        set_placeholders_and_id(&mut msg).unwrap();
        assert!(msg.is_annotated());
        let first = (msg.msg_id, msg.placeholders.clone());

        set_placeholders_and_id(&mut msg).unwrap();
        assert_eq!((msg.msg_id, msg.placeholders.clone()), first);
    }

    #[test]
    fn test_failure_leaves_node_untouched() {
        let mut msg = parse_msg("{plural $n}{case 1}one{/plural}");
        assert!(set_placeholders_and_id(&mut msg).is_err());
        assert_eq!(msg.msg_id, None);
        assert_eq!(msg.placeholders, None);
    }
}
