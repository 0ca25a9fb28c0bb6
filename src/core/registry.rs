//! Template registry - qualified template names mapped to their trees.
//!
//! The registry is built once per extraction run by adding parsed files,
//! then handed to the annotation and extraction passes. Entries are never
//! removed.
//!
//! ## Ordering
//!
//! Templates iterate in lexicographic order of their qualified name, so
//! every pass (and the resulting catalog) sees the same order regardless of
//! the order in which files were added.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::core::ast::{Node, NodeId, SoyFile, TemplateNode};
use crate::errors::{DuplicateTemplateError, ExtractError, MalformedInputError};
use crate::utils::{build_line_index, offset_to_line};

/// A registered template with its source location metadata.
#[derive(Debug)]
pub struct TemplateEntry {
    pub node: TemplateNode,
    file: Arc<str>,
    /// Originating line of every node in the template's subtree.
    lines: HashMap<NodeId, usize>,
}

impl TemplateEntry {
    pub fn source_file(&self) -> &str {
        &self.file
    }

    pub fn line_number(&self, node: NodeId) -> Option<usize> {
        self.lines.get(&node).copied()
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    templates: BTreeMap<String, TemplateEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every template of a parsed file under `namespace.name`.
    ///
    /// The file must start with a namespace declaration. Nothing from the
    /// file is registered if it is malformed or any of its templates
    /// collides with an existing one.
    pub fn add(&mut self, file: SoyFile) -> Result<(), ExtractError> {
        let SoyFile {
            path,
            source,
            nodes,
        } = file;

        let mut nodes = nodes.into_iter();
        let namespace = match nodes.next() {
            Some(Node::Namespace(namespace)) => namespace.name,
            Some(other) => {
                return Err(MalformedInputError {
                    file: path,
                    reason: format!(
                        "input must begin with a namespace declaration, found {{{}}}",
                        other.kind()
                    ),
                }
                .into());
            }
            None => {
                return Err(MalformedInputError {
                    file: path,
                    reason: "file contains no declarations".to_string(),
                }
                .into());
            }
        };

        let mut pending: Vec<(String, TemplateNode)> = Vec::new();
        for node in nodes {
            let Node::Template(template) = node else {
                continue;
            };
            let name = format!("{}.{}", namespace, template.name);

            let first_file = self
                .templates
                .get(&name)
                .map(|entry| entry.source_file().to_string())
                .or_else(|| {
                    pending
                        .iter()
                        .any(|(pending_name, _)| *pending_name == name)
                        .then(|| path.clone())
                });
            if let Some(first_file) = first_file {
                return Err(DuplicateTemplateError {
                    name,
                    file: path,
                    first_file,
                }
                .into());
            }
            pending.push((name, template));
        }

        let file: Arc<str> = Arc::from(path);
        let line_index = build_line_index(&source);
        for (name, template) in pending {
            let mut lines = HashMap::new();
            record_lines(&template, &line_index, &mut lines);
            self.templates.insert(
                name,
                TemplateEntry {
                    node: template,
                    file: Arc::clone(&file),
                    lines,
                },
            );
        }

        Ok(())
    }

    /// All registered templates in canonical (lexicographic) order.
    pub fn templates(&self) -> impl Iterator<Item = (&str, &TemplateEntry)> {
        self.templates
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Mutable access in the same order as [`Registry::templates`].
    pub fn templates_mut(&mut self) -> impl Iterator<Item = (&str, &mut TemplateEntry)> {
        self.templates
            .iter_mut()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn template(&self, name: &str) -> Option<&TemplateEntry> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// File the template was registered from.
    pub fn source_file(&self, name: &str) -> Option<&str> {
        self.template(name).map(TemplateEntry::source_file)
    }

    /// Line a node of the named template originates from.
    pub fn line_number(&self, name: &str, node: NodeId) -> Option<usize> {
        self.template(name)
            .and_then(|entry| entry.line_number(node))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn record_lines(template: &TemplateNode, line_index: &[usize], lines: &mut HashMap<NodeId, usize>) {
    lines.insert(template.id, offset_to_line(line_index, template.pos.0));
    for node in &template.body {
        record_node_lines(node, line_index, lines);
    }
}

fn record_node_lines(node: &Node, line_index: &[usize], lines: &mut HashMap<NodeId, usize>) {
    lines.insert(node.id(), offset_to_line(line_index, node.pos().0));
    if let Some(children) = node.children() {
        for child in children {
            record_node_lines(child, line_index, lines);
        }
    }
}
