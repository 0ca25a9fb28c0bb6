//! Syntax tree for parsed template files.
//!
//! Nodes form a tagged union (`Node`) with an explicit kind discriminator.
//! Parent nodes expose their children through [`Node::children`], which is
//! the only capability the annotation and extraction passes rely on.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Identity of a node, unique within one parsed file.
///
/// Ids are assigned by the parser in pre-order, so a parent always has a
/// smaller id than any of its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Byte offset of a node's opening token in its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Pos(pub usize);

/// Placeholder names assigned to the print nodes of a message, keyed by node.
pub type Placeholders = BTreeMap<NodeId, String>;

/// Discriminator for [`Node`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Namespace,
    Template,
    Text,
    Print,
    Msg,
    Plural,
    Select,
    Case,
    If,
    IfBranch,
    For,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Namespace => "namespace",
            NodeKind::Template => "template",
            NodeKind::Text => "text",
            NodeKind::Print => "print",
            NodeKind::Msg => "msg",
            NodeKind::Plural => "plural",
            NodeKind::Select => "select",
            NodeKind::Case => "case",
            NodeKind::If => "if",
            NodeKind::IfBranch => "if-branch",
            NodeKind::For => "for",
        };
        write!(f, "{}", name)
    }
}

/// An embedded expression, kept as source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub text: String,
}

static DATA_REF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)$").unwrap()
});

impl Expr {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Dotted key path of a plain data reference (`$user.name` -> `user.name`).
    ///
    /// Returns `None` for any other kind of expression.
    pub fn data_ref_path(&self) -> Option<&str> {
        DATA_REF_REGEX
            .captures(&self.text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Last key of a plain data reference (`$user.name` -> `name`).
    pub fn last_key(&self) -> Option<&str> {
        self.data_ref_path()
            .and_then(|path| path.rsplit('.').next())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// `{namespace name}` declaration. Must open every template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceNode {
    pub id: NodeId,
    pub pos: Pos,
    pub name: String,
}

/// `{template .name}...{/template}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNode {
    pub id: NodeId,
    pub pos: Pos,
    /// Template name without the leading dot.
    pub name: String,
    pub body: Vec<Node>,
}

/// Literal text after whitespace joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub id: NodeId,
    pub pos: Pos,
    pub text: String,
}

/// `{$expr}` or `{print expr}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintNode {
    pub id: NodeId,
    pub pos: Pos,
    pub expr: Expr,
}

/// `{msg desc="..." meaning="..."}...{/msg}`.
///
/// `msg_id` and `placeholders` stay `None` until the annotation pass runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgNode {
    pub id: NodeId,
    pub pos: Pos,
    pub desc: String,
    pub meaning: String,
    pub msg_id: Option<u64>,
    pub placeholders: Option<Placeholders>,
    pub body: Vec<Node>,
}

impl MsgNode {
    /// The plural construct heading the message body, if any.
    pub fn plural(&self) -> Option<&PluralNode> {
        match self.body.first() {
            Some(Node::Plural(plural)) => Some(plural),
            _ => None,
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.msg_id.is_some() && self.placeholders.is_some()
    }
}

/// `{plural $var}{case 1}...{default}...{/plural}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralNode {
    pub id: NodeId,
    pub pos: Pos,
    /// Variable the plural switches on, without the `$` sigil.
    pub var_name: String,
    pub expr: Expr,
    /// `Case` nodes, the `{default}` case last.
    pub cases: Vec<Node>,
}

/// `{select $var}{case 'x'}...{default}...{/select}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectNode {
    pub id: NodeId,
    pub pos: Pos,
    pub expr: Expr,
    pub cases: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseValue {
    Int(i64),
    Str(String),
    Default,
}

impl fmt::Display for CaseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseValue::Int(n) => write!(f, "{}", n),
            CaseValue::Str(s) => write!(f, "'{}'", s),
            CaseValue::Default => write!(f, "default"),
        }
    }
}

/// A branch of a plural or select construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseNode {
    pub id: NodeId,
    pub pos: Pos,
    pub value: CaseValue,
    pub body: Vec<Node>,
}

/// `{if}...{elseif}...{else}...{/if}`; children are `IfBranch` nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfNode {
    pub id: NodeId,
    pub pos: Pos,
    pub branches: Vec<Node>,
}

/// One branch of an `{if}`. `cond` is `None` for `{else}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfBranchNode {
    pub id: NodeId,
    pub pos: Pos,
    pub cond: Option<Expr>,
    pub body: Vec<Node>,
}

/// `{for $var in expr}...{/for}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForNode {
    pub id: NodeId,
    pub pos: Pos,
    pub var: String,
    pub list: Expr,
    pub body: Vec<Node>,
}

/// A syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Namespace(NamespaceNode),
    Template(TemplateNode),
    Text(TextNode),
    Print(PrintNode),
    Msg(MsgNode),
    Plural(PluralNode),
    Select(SelectNode),
    Case(CaseNode),
    If(IfNode),
    IfBranch(IfBranchNode),
    For(ForNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Namespace(_) => NodeKind::Namespace,
            Node::Template(_) => NodeKind::Template,
            Node::Text(_) => NodeKind::Text,
            Node::Print(_) => NodeKind::Print,
            Node::Msg(_) => NodeKind::Msg,
            Node::Plural(_) => NodeKind::Plural,
            Node::Select(_) => NodeKind::Select,
            Node::Case(_) => NodeKind::Case,
            Node::If(_) => NodeKind::If,
            Node::IfBranch(_) => NodeKind::IfBranch,
            Node::For(_) => NodeKind::For,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Node::Namespace(n) => n.id,
            Node::Template(n) => n.id,
            Node::Text(n) => n.id,
            Node::Print(n) => n.id,
            Node::Msg(n) => n.id,
            Node::Plural(n) => n.id,
            Node::Select(n) => n.id,
            Node::Case(n) => n.id,
            Node::If(n) => n.id,
            Node::IfBranch(n) => n.id,
            Node::For(n) => n.id,
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Node::Namespace(n) => n.pos,
            Node::Template(n) => n.pos,
            Node::Text(n) => n.pos,
            Node::Print(n) => n.pos,
            Node::Msg(n) => n.pos,
            Node::Plural(n) => n.pos,
            Node::Select(n) => n.pos,
            Node::Case(n) => n.pos,
            Node::If(n) => n.pos,
            Node::IfBranch(n) => n.pos,
            Node::For(n) => n.pos,
        }
    }

    /// Ordered children of a parent node; `None` for leaves.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Template(n) => Some(n.body.as_slice()),
            Node::Msg(n) => Some(n.body.as_slice()),
            Node::Plural(n) => Some(n.cases.as_slice()),
            Node::Select(n) => Some(n.cases.as_slice()),
            Node::Case(n) => Some(n.body.as_slice()),
            Node::If(n) => Some(n.branches.as_slice()),
            Node::IfBranch(n) => Some(n.body.as_slice()),
            Node::For(n) => Some(n.body.as_slice()),
            Node::Namespace(_) | Node::Text(_) | Node::Print(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut [Node]> {
        match self {
            Node::Template(n) => Some(n.body.as_mut_slice()),
            Node::Msg(n) => Some(n.body.as_mut_slice()),
            Node::Plural(n) => Some(n.cases.as_mut_slice()),
            Node::Select(n) => Some(n.cases.as_mut_slice()),
            Node::Case(n) => Some(n.body.as_mut_slice()),
            Node::If(n) => Some(n.branches.as_mut_slice()),
            Node::IfBranch(n) => Some(n.body.as_mut_slice()),
            Node::For(n) => Some(n.body.as_mut_slice()),
            Node::Namespace(_) | Node::Text(_) | Node::Print(_) => None,
        }
    }
}

/// Result of parsing one template source file.
#[derive(Debug, Clone)]
pub struct SoyFile {
    pub path: String,
    pub source: String,
    /// Top-level nodes in source order; a well-formed file starts with a namespace.
    pub nodes: Vec<Node>,
}
