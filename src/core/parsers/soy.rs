use std::sync::LazyLock;

use regex::Regex;

use crate::core::ast::{
    CaseNode, CaseValue, Expr, ForNode, IfBranchNode, IfNode, MsgNode, NamespaceNode, Node,
    NodeId, PluralNode, Pos, PrintNode, SelectNode, SoyFile, TemplateNode, TextNode,
};
use crate::core::parsers::lexer::{Token, TokenKind, tokenize};
use crate::errors::ParseError;
use crate::utils::{build_line_index, line_text, offset_to_line_col};

static NAMESPACE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap());

static TEMPLATE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.?([A-Za-z_][A-Za-z0-9_]*)$").unwrap());

// name="value" pairs inside a command tag
static ATTRIBUTE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*"([^"]*)""#).unwrap());

static FOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$([A-Za-z_][A-Za-z0-9_]*)\s+in\s+(.+)$").unwrap());

/// Parse a template source file into its top-level nodes.
///
/// The parser does not require a leading namespace declaration; that rule
/// is enforced when the file is added to the registry.
pub fn parse_file(path: &str, content: &str) -> Result<SoyFile, ParseError> {
    let line_index = build_line_index(content);
    let tokens = tokenize(content)
        .map_err(|e| make_error(path, content, &line_index, e.pos, e.message))?;

    let mut parser = Parser {
        path,
        source: content,
        line_index,
        tokens,
        index: 0,
        next_id: 0,
    };
    let nodes = parser.parse_top_level()?;

    Ok(SoyFile {
        path: path.to_string(),
        source: content.to_string(),
        nodes,
    })
}

fn make_error(
    path: &str,
    source: &str,
    line_index: &[usize],
    pos: usize,
    message: impl Into<String>,
) -> ParseError {
    let (line, col) = offset_to_line_col(source, line_index, pos);
    ParseError {
        file: path.to_string(),
        line,
        col,
        message: message.into(),
        source_line: line_text(source, line_index, line).to_string(),
    }
}

/// Which constructs a body may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Template,
    Msg,
}

/// The tag that ended a body: a close tag or a branch separator.
struct Terminator {
    pos: usize,
    command: String,
    args: String,
}

impl Terminator {
    fn display(&self) -> String {
        if self.args.is_empty() {
            format!("{{{}}}", self.command)
        } else {
            format!("{{{} {}}}", self.command, self.args)
        }
    }
}

struct Parser<'a> {
    path: &'a str,
    source: &'a str,
    line_index: Vec<usize>,
    tokens: Vec<Token>,
    index: usize,
    next_id: u32,
}

impl Parser<'_> {
    fn error_at(&self, pos: usize, message: impl Into<String>) -> ParseError {
        make_error(self.path, self.source, &self.line_index, pos, message)
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn parse_top_level(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();

        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::Text(raw) => {
                    if let Some(offset) = raw.find(|c: char| !c.is_whitespace()) {
                        return Err(self.error_at(
                            token.pos + offset,
                            "unexpected text outside of a template",
                        ));
                    }
                }
                TokenKind::Tag(content) => {
                    let (command, args) = split_command(&content);
                    match command {
                        "namespace" => nodes.push(self.parse_namespace(token.pos, args)?),
                        "template" => nodes.push(self.parse_template(token.pos, args)?),
                        _ => {
                            return Err(self.error_at(
                                token.pos,
                                format!("unexpected {{{}}} outside of a template", content),
                            ));
                        }
                    }
                }
            }
        }

        Ok(nodes)
    }

    fn parse_namespace(&mut self, pos: usize, args: &str) -> Result<Node, ParseError> {
        let name = args.split_whitespace().next().unwrap_or_default();
        if !NAMESPACE_NAME_REGEX.is_match(name) {
            return Err(self.error_at(pos, format!("invalid namespace name '{}'", name)));
        }
        Ok(Node::Namespace(NamespaceNode {
            id: self.alloc_id(),
            pos: Pos(pos),
            name: name.to_string(),
        }))
    }

    fn parse_template(&mut self, pos: usize, args: &str) -> Result<Node, ParseError> {
        let raw_name = args.split_whitespace().next().unwrap_or_default();
        let name = TEMPLATE_NAME_REGEX
            .captures(raw_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| self.error_at(pos, format!("invalid template name '{}'", raw_name)))?;

        let id = self.alloc_id();
        let (body, end) = self.parse_body(Context::Template, "{/template}")?;
        self.expect_close(&end, "template")?;

        Ok(Node::Template(TemplateNode {
            id,
            pos: Pos(pos),
            name,
            body,
        }))
    }

    /// Parse nodes until a close tag or branch separator, which is consumed
    /// and returned for the caller to check.
    fn parse_body(
        &mut self,
        context: Context,
        expected: &str,
    ) -> Result<(Vec<Node>, Terminator), ParseError> {
        let mut body = Vec::new();

        loop {
            let Some(token) = self.next_token() else {
                return Err(self.error_at(
                    self.source.len(),
                    format!("unexpected end of file, expected {}", expected),
                ));
            };

            let content = match token.kind {
                TokenKind::Text(raw) => {
                    let text = join_lines(&raw);
                    if !text.is_empty() {
                        self.push_text(&mut body, token.pos, text);
                    }
                    continue;
                }
                TokenKind::Tag(content) => content,
            };
            if content.is_empty() {
                return Err(self.error_at(token.pos, "empty tag"));
            }

            let (command, args) = split_command(&content);
            match command {
                c if c.starts_with('/') || matches!(c, "elseif" | "else" | "case" | "default") => {
                    return Ok((
                        body,
                        Terminator {
                            pos: token.pos,
                            command: command.to_string(),
                            args: args.to_string(),
                        },
                    ));
                }
                "msg" => {
                    if context == Context::Msg {
                        return Err(self.error_at(token.pos, "nested {msg} is not allowed"));
                    }
                    body.push(self.parse_msg(token.pos, args)?);
                }
                "plural" | "select" => {
                    if context != Context::Msg {
                        return Err(self.error_at(
                            token.pos,
                            format!("{{{}}} is only allowed inside {{msg}}", command),
                        ));
                    }
                    let node = if command == "plural" {
                        self.parse_plural(token.pos, args)?
                    } else {
                        self.parse_select(token.pos, args)?
                    };
                    body.push(node);
                }
                "if" | "for" => {
                    if context == Context::Msg {
                        return Err(self.error_at(
                            token.pos,
                            format!("{{{}}} is not allowed inside {{msg}}", command),
                        ));
                    }
                    let node = if command == "if" {
                        self.parse_if(token.pos, args)?
                    } else {
                        self.parse_for(token.pos, args)?
                    };
                    body.push(node);
                }
                "namespace" | "template" => {
                    return Err(self.error_at(
                        token.pos,
                        format!("{{{}}} is not allowed here", command),
                    ));
                }
                "print" => {
                    if args.is_empty() {
                        return Err(self.error_at(token.pos, "{print} requires an expression"));
                    }
                    body.push(self.print_node(token.pos, args));
                }
                _ => {
                    if let Some(text) = special_char(&content) {
                        if !text.is_empty() {
                            self.push_text(&mut body, token.pos, text.to_string());
                        }
                    } else if is_unknown_command(command, args) {
                        return Err(
                            self.error_at(token.pos, format!("unknown command '{}'", command))
                        );
                    } else {
                        body.push(self.print_node(token.pos, &content));
                    }
                }
            }
        }
    }

    fn expect_close(&self, end: &Terminator, name: &str) -> Result<(), ParseError> {
        if end.command == format!("/{}", name) {
            Ok(())
        } else {
            Err(self.error_at(
                end.pos,
                format!("unexpected {}, expected {{/{}}}", end.display(), name),
            ))
        }
    }

    /// Append text, merging with a preceding text node.
    fn push_text(&mut self, body: &mut Vec<Node>, pos: usize, text: String) {
        if let Some(Node::Text(last)) = body.last_mut() {
            last.text.push_str(&text);
            return;
        }
        body.push(Node::Text(TextNode {
            id: self.alloc_id(),
            pos: Pos(pos),
            text,
        }));
    }

    fn print_node(&mut self, pos: usize, expr: &str) -> Node {
        Node::Print(PrintNode {
            id: self.alloc_id(),
            pos: Pos(pos),
            expr: Expr::new(expr),
        })
    }

    fn parse_msg(&mut self, pos: usize, args: &str) -> Result<Node, ParseError> {
        let attributes = parse_attributes(args)
            .ok_or_else(|| self.error_at(pos, "malformed attributes in {msg}"))?;
        let attribute = |name: &str| {
            attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        };
        let desc = attribute("desc")
            .ok_or_else(|| self.error_at(pos, "{msg} is missing the required 'desc' attribute"))?;
        let meaning = attribute("meaning").unwrap_or_default();

        let id = self.alloc_id();
        let (body, end) = self.parse_body(Context::Msg, "{/msg}")?;
        self.expect_close(&end, "msg")?;

        Ok(Node::Msg(MsgNode {
            id,
            pos: Pos(pos),
            desc,
            meaning,
            msg_id: None,
            placeholders: None,
            body,
        }))
    }

    fn parse_plural(&mut self, pos: usize, args: &str) -> Result<Node, ParseError> {
        if args.is_empty() {
            return Err(self.error_at(pos, "{plural} requires an expression"));
        }
        let expr = Expr::new(args);
        let var_name = expr
            .data_ref_path()
            .unwrap_or_else(|| args.trim_start_matches('$'))
            .to_string();

        let id = self.alloc_id();
        let cases = self.parse_cases(pos, "plural", |value| {
            value.parse::<i64>().ok().map(CaseValue::Int)
        })?;

        Ok(Node::Plural(PluralNode {
            id,
            pos: Pos(pos),
            var_name,
            expr,
            cases,
        }))
    }

    fn parse_select(&mut self, pos: usize, args: &str) -> Result<Node, ParseError> {
        if args.is_empty() {
            return Err(self.error_at(pos, "{select} requires an expression"));
        }

        let id = self.alloc_id();
        let cases = self.parse_cases(pos, "select", |value| {
            unquote(value).map(|s| CaseValue::Str(s.to_string()))
        })?;

        Ok(Node::Select(SelectNode {
            id,
            pos: Pos(pos),
            expr: Expr::new(args),
            cases,
        }))
    }

    /// Parse the `{case}`/`{default}` branches of a plural or select.
    fn parse_cases(
        &mut self,
        pos: usize,
        name: &str,
        parse_value: impl Fn(&str) -> Option<CaseValue>,
    ) -> Result<Vec<Node>, ParseError> {
        let close = format!("/{}", name);
        let expected = format!("{{/{}}}", name);

        let (preamble, mut end) = self.parse_body(Context::Msg, &expected)?;
        if let Some(node) = preamble.first() {
            return Err(self.error_at(
                node.pos().0,
                format!("unexpected content before the first {{case}} in {{{}}}", name),
            ));
        }

        let mut cases = Vec::new();
        let mut seen_default = false;
        loop {
            let value = match end.command.as_str() {
                "case" => {
                    if seen_default {
                        return Err(self.error_at(end.pos, "{case} after {default}"));
                    }
                    parse_value(&end.args).ok_or_else(|| {
                        self.error_at(end.pos, format!("invalid case value '{}'", end.args))
                    })?
                }
                "default" => {
                    if seen_default {
                        return Err(self.error_at(end.pos, "duplicate {default}"));
                    }
                    seen_default = true;
                    CaseValue::Default
                }
                c if c == close => break,
                _ => {
                    return Err(self.error_at(
                        end.pos,
                        format!("unexpected {} in {{{}}}", end.display(), name),
                    ));
                }
            };

            let id = self.alloc_id();
            let case_pos = end.pos;
            let (body, next) = self.parse_body(Context::Msg, &expected)?;
            cases.push(Node::Case(CaseNode {
                id,
                pos: Pos(case_pos),
                value,
                body,
            }));
            end = next;
        }

        if cases.is_empty() {
            return Err(self.error_at(pos, format!("{{{}}} has no cases", name)));
        }
        Ok(cases)
    }

    fn parse_if(&mut self, pos: usize, args: &str) -> Result<Node, ParseError> {
        if args.is_empty() {
            return Err(self.error_at(pos, "{if} requires a condition"));
        }

        let id = self.alloc_id();
        let mut branches = Vec::new();
        let mut cond = Some(Expr::new(args));
        let mut branch_pos = pos;
        let mut seen_else = false;

        loop {
            let branch_id = self.alloc_id();
            let (body, end) = self.parse_body(Context::Template, "{/if}")?;
            branches.push(Node::IfBranch(IfBranchNode {
                id: branch_id,
                pos: Pos(branch_pos),
                cond: cond.take(),
                body,
            }));

            match end.command.as_str() {
                "elseif" if !seen_else => {
                    if end.args.is_empty() {
                        return Err(self.error_at(end.pos, "{elseif} requires a condition"));
                    }
                    cond = Some(Expr::new(end.args.as_str()));
                }
                "else" if !seen_else => seen_else = true,
                "/if" => break,
                _ => {
                    return Err(self.error_at(
                        end.pos,
                        format!("unexpected {} in {{if}}", end.display()),
                    ));
                }
            }
            branch_pos = end.pos;
        }

        Ok(Node::If(IfNode {
            id,
            pos: Pos(pos),
            branches,
        }))
    }

    fn parse_for(&mut self, pos: usize, args: &str) -> Result<Node, ParseError> {
        let (var, list) = FOR_REGEX
            .captures(args)
            .map(|caps| (caps[1].to_string(), caps[2].trim().to_string()))
            .ok_or_else(|| self.error_at(pos, "malformed {for}, expected {for $var in expr}"))?;

        let id = self.alloc_id();
        let (body, end) = self.parse_body(Context::Template, "{/for}")?;
        self.expect_close(&end, "for")?;

        Ok(Node::For(ForNode {
            id,
            pos: Pos(pos),
            var,
            list: Expr::new(list),
            body,
        }))
    }
}

fn split_command(content: &str) -> (&str, &str) {
    match content.split_once(char::is_whitespace) {
        Some((command, args)) => (command, args.trim()),
        None => (content, ""),
    }
}

fn special_char(content: &str) -> Option<&'static str> {
    match content {
        "sp" => Some(" "),
        "nil" => Some(""),
        "\\n" => Some("\n"),
        "\\r" => Some("\r"),
        "\\t" => Some("\t"),
        "lb" => Some("{"),
        "rb" => Some("}"),
        _ => None,
    }
}

/// A lowercase word followed by an argument-like token reads as a command
/// this parser does not know (e.g. `{call .foo}`), not as an expression.
fn is_unknown_command(command: &str, args: &str) -> bool {
    !args.is_empty()
        && command.chars().all(|c| c.is_ascii_lowercase())
        && args
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '.' | '$' | '"' | '\''))
}

/// Parse `name="value"` pairs. Returns `None` if anything else is present.
fn parse_attributes(args: &str) -> Option<Vec<(String, String)>> {
    let leftover = ATTRIBUTE_REGEX.replace_all(args, "");
    if !leftover.trim().is_empty() {
        return None;
    }
    Some(
        ATTRIBUTE_REGEX
            .captures_iter(args)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect(),
    )
}

fn unquote(value: &str) -> Option<&str> {
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
}

/// Apply line joining to a raw text run.
///
/// Lines are trimmed at the line breaks and lines that become empty are
/// dropped. Remaining lines are joined with a single space, or with nothing
/// when the join borders an HTML tag.
fn join_lines(raw: &str) -> String {
    if !raw.contains('\n') {
        return raw.to_string();
    }

    let lines: Vec<&str> = raw.split('\n').collect();
    let last = lines.len() - 1;
    let mut joined = String::new();

    for (i, line) in lines.iter().enumerate() {
        let part = match i {
            0 => line.trim_end(),
            i if i == last => line.trim_start(),
            _ => line.trim(),
        };
        if part.is_empty() {
            continue;
        }
        if !joined.is_empty() && !joined.ends_with('>') && !part.starts_with('<') {
            joined.push(' ');
        }
        joined.push_str(part);
    }

    joined
}
