//! Catalog extraction pass.
//!
//! Walks every registered template (in registry order, depth-first) and
//! turns each annotated `{msg}` into a catalog entry. The first invalid
//! message aborts the whole extraction.

use crate::core::ast::{MsgNode, Node};
use crate::core::catalog::{Catalog, CatalogEntry, CatalogHeader};
use crate::core::msg::pomsg;
use crate::core::registry::{Registry, TemplateEntry};
use crate::errors::{ExtractError, InvalidMessageError};

pub fn extract(registry: &Registry) -> Result<Catalog, ExtractError> {
    extract_with_header(registry, CatalogHeader::default())
}

pub fn extract_with_header(
    registry: &Registry,
    header: CatalogHeader,
) -> Result<Catalog, ExtractError> {
    let mut catalog = Catalog::new(header);
    for (name, entry) in registry.templates() {
        let mut extractor = Extractor {
            name,
            template: entry,
            catalog: &mut catalog,
        };
        for node in &entry.node.body {
            extractor.extract(node)?;
        }
    }
    Ok(catalog)
}

/// Extraction state for one template.
struct Extractor<'a> {
    name: &'a str,
    template: &'a TemplateEntry,
    catalog: &'a mut Catalog,
}

impl Extractor<'_> {
    fn extract(&mut self, node: &Node) -> Result<(), ExtractError> {
        match node {
            Node::Msg(msg) => {
                let entry = self.entry_for(msg)?;
                self.catalog.push(entry);
            }
            other => {
                if let Some(children) = other.children() {
                    for child in children {
                        self.extract(child)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn entry_for(&self, msg: &MsgNode) -> Result<CatalogEntry, ExtractError> {
        let line = self.template.line_number(msg.id).unwrap_or_default();
        let invalid = |reason: String| -> ExtractError {
            InvalidMessageError {
                template: self.name.to_string(),
                file: self.template.source_file().to_string(),
                line,
                reason,
            }
            .into()
        };

        pomsg::validate(msg).map_err(|err| invalid(err.reason))?;
        let Some(msg_id) = msg.msg_id.filter(|_| msg.is_annotated()) else {
            return Err(invalid("message has not been annotated".to_string()));
        };

        let plural_var = msg
            .plural()
            .map(|plural| format!(" var={}", plural.var_name))
            .unwrap_or_default();

        Ok(CatalogEntry {
            context: msg.meaning.clone(),
            msgid: pomsg::msgid(msg),
            msgid_plural: pomsg::msgid_plural(msg),
            plural: msg.plural().is_some(),
            extracted_comment: msg.desc.clone(),
            references: vec![
                format!("{}:{}", self.template.source_file(), line),
                format!("id={}{}", msg_id, plural_var),
            ],
        })
    }
}
