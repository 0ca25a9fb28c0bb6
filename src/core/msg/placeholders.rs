use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::core::ast::{MsgNode, Node, NodeId, Placeholders, PrintNode};

/// Name used for expressions that are not plain data references.
pub const FALLBACK_PLACEHOLDER: &str = "XXX";

static CAMEL_BOUNDARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

/// Base placeholder name for an expression before de-duplication.
///
/// `$userName` -> `USER_NAME`, `$user.firstName` -> `FIRST_NAME`,
/// anything else -> `XXX`.
pub fn base_placeholder_name(print: &PrintNode) -> String {
    match print.expr.last_key() {
        Some(key) => CAMEL_BOUNDARY_REGEX
            .replace_all(key, "${1}_${2}")
            .to_uppercase(),
        None => FALLBACK_PLACEHOLDER.to_string(),
    }
}

/// Assign a placeholder name to every print node in the message body,
/// including those nested in plural and select cases.
///
/// Prints with identical expression text share a name. When distinct
/// expressions produce the same base name, each gets a numeric suffix
/// (`NAME_1`, `NAME_2`, ...) in body order, skipping any name already used
/// by another print.
pub fn compute_placeholders(msg: &MsgNode) -> Placeholders {
    let mut prints = Vec::new();
    collect_prints(&msg.body, &mut prints);

    // base name -> distinct expression texts in first-seen order
    let mut expressions_by_base: HashMap<String, Vec<&str>> = HashMap::new();
    let mut bases: Vec<(NodeId, &str, String)> = Vec::with_capacity(prints.len());
    for print in prints {
        let base = base_placeholder_name(print);
        let exprs = expressions_by_base.entry(base.clone()).or_default();
        if !exprs.contains(&print.expr.text.as_str()) {
            exprs.push(print.expr.text.as_str());
        }
        bases.push((print.id, print.expr.text.as_str(), base));
    }

    // Unsuffixed names are final; suffixed ones must avoid them.
    let mut taken: HashSet<String> = expressions_by_base
        .iter()
        .filter(|(_, exprs)| exprs.len() == 1)
        .map(|(base, _)| base.clone())
        .collect();
    let mut suffixed: HashMap<(&str, &str), String> = HashMap::new();
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();

    let mut placeholders = Placeholders::new();
    for (id, expr, base) in &bases {
        if expressions_by_base[base].len() == 1 {
            placeholders.insert(*id, base.clone());
            continue;
        }
        let name = suffixed.entry((base.as_str(), *expr)).or_insert_with(|| {
            let suffix = next_suffix.entry(base.as_str()).or_insert(0);
            loop {
                *suffix += 1;
                let candidate = format!("{}_{}", base, suffix);
                if taken.insert(candidate.clone()) {
                    break candidate;
                }
            }
        });
        placeholders.insert(*id, name.clone());
    }
    placeholders
}

fn collect_prints<'a>(nodes: &'a [Node], out: &mut Vec<&'a PrintNode>) {
    for node in nodes {
        match node {
            Node::Print(print) => out.push(print),
            other => {
                if let Some(children) = other.children() {
                    collect_prints(children, out);
                }
            }
        }
    }
}
