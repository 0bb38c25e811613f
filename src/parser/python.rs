//! Tree-sitter backed Python parser.
//!
//! Parses with `tree-sitter-python`, rejects trees carrying `ERROR` or
//! `MISSING` nodes or failing the structural checks, and lowers the concrete syntax tree into the owned
//! `Node` representation. Comments and string internals are not part of the
//! lowered tree.

use tree_sitter::{Language, Node as TsNode, Parser};

use super::{structure, Node, NodeKind, SyntaxErrorDescriptor, SyntaxTree};

/// Named grammar nodes that have no counterpart in the Python AST.
const TRIVIA_KINDS: &[&str] = &["comment", "line_continuation"];

/// Parse Python source into a lowered syntax tree.
///
/// Never panics: every failure, including an unusable grammar, is reported
/// as a `SyntaxErrorDescriptor`.
pub fn parse(text: &str) -> Result<SyntaxTree, SyntaxErrorDescriptor> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let language: Language = tree_sitter_python::LANGUAGE.into();
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&language) {
        return Err(internal_failure(format!("python grammar unavailable: {}", e)));
    }

    let tree = parser
        .parse(text, None)
        .ok_or_else(|| internal_failure("parser produced no tree".to_string()))?;
    let root = tree.root_node();

    let problem = first_syntax_problem(root)
        .map(|(node, message)| (node.start_position(), message))
        .or_else(|| structure::first_problem(root, text.as_bytes()));
    if let Some((position, message)) = problem {
        let descriptor = SyntaxErrorDescriptor {
            line: position.row + 1,
            column: position.column + 1,
            message,
            offending_text: text
                .lines()
                .nth(position.row)
                .unwrap_or("")
                .trim()
                .to_string(),
        };
        tracing::debug!("syntax error at {}", descriptor);
        return Err(descriptor);
    }

    Ok(SyntaxTree::new(lower(root, text.as_bytes())))
}

fn internal_failure(message: String) -> SyntaxErrorDescriptor {
    SyntaxErrorDescriptor {
        line: 1,
        column: 1,
        message,
        offending_text: String::new(),
    }
}

/// Find the first node, in document order, that makes the source invalid
/// Python 3, together with a message describing it.
fn first_syntax_problem(root: TsNode) -> Option<(TsNode, String)> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if let Some(message) = problem_message(node) {
            return Some((node, message));
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn problem_message(node: TsNode) -> Option<String> {
    if node.is_missing() {
        return Some(if node.is_named() {
            format!("expected {}", node.kind())
        } else {
            format!("expected '{}'", node.kind())
        });
    }
    if node.is_error() {
        return Some("invalid syntax".to_string());
    }
    // The grammar still accepts Python 2 statement forms.
    match node.kind() {
        "print_statement" => Some(
            "Missing parentheses in call to 'print'. Did you mean print(...)?".to_string(),
        ),
        "exec_statement" => Some("Missing parentheses in call to 'exec'".to_string()),
        _ => None,
    }
}

fn node_text<'s>(node: TsNode, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

pub(super) fn is_trivia(node: &TsNode) -> bool {
    TRIVIA_KINDS.contains(&node.kind())
}

/// Lower a tree-sitter node and its subtree.
fn lower(node: TsNode, source: &[u8]) -> Node {
    let kind = match node.kind() {
        "module" => NodeKind::Module {
            docstring: leading_docstring(node, source),
        },
        "function_definition" => NodeKind::FunctionDef {
            name: field_text(node, "name", source),
            is_async: node.child(0).map(|c| c.kind() == "async").unwrap_or(false),
            docstring: node
                .child_by_field_name("body")
                .and_then(|body| leading_docstring(body, source)),
        },
        "class_definition" => NodeKind::ClassDef {
            name: field_text(node, "name", source),
            docstring: node
                .child_by_field_name("body")
                .and_then(|body| leading_docstring(body, source)),
        },
        "try_statement" => {
            let mut cursor = node.walk();
            let handlers = node
                .named_children(&mut cursor)
                .filter(|c| matches!(c.kind(), "except_clause" | "except_group_clause"))
                .count();
            NodeKind::Try { handlers }
        }
        "except_clause" | "except_group_clause" => NodeKind::ExceptHandler,
        "import_statement" => NodeKind::Import {
            names: imported_names(node, source),
        },
        "import_from_statement" => NodeKind::ImportFrom {
            module: node
                .child_by_field_name("module_name")
                .map(|m| node_text(m, source).to_string()),
            names: imported_names(node, source),
        },
        "future_import_statement" => NodeKind::ImportFrom {
            module: Some("__future__".to_string()),
            names: imported_names(node, source),
        },
        other => NodeKind::Other(other),
    };

    let position = node.start_position();
    Node {
        kind,
        line: position.row + 1,
        column: position.column + 1,
        children: lower_children(node, source),
    }
}

fn lower_children(node: TsNode, source: &[u8]) -> Vec<Node> {
    let mut cursor = node.walk();
    match node.kind() {
        // String literals, implicit concatenations included, are one leaf
        // apart from their f-string interpolations.
        "string" | "concatenated_string" => {
            let mut interpolations = Vec::new();
            collect_interpolations(node, &mut interpolations);
            interpolations.into_iter().map(|c| lower(c, source)).collect()
        }
        _ => node
            .named_children(&mut cursor)
            .filter(|c| !is_trivia(c))
            .map(|c| lower(c, source))
            .collect(),
    }
}

fn collect_interpolations<'t>(node: TsNode<'t>, out: &mut Vec<TsNode<'t>>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "interpolation" => out.push(child),
            "string" => collect_interpolations(child, out),
            _ => {}
        }
    }
}

fn field_text(node: TsNode, field: &str, source: &[u8]) -> String {
    node.child_by_field_name(field)
        .map(|n| node_text(n, source).to_string())
        .unwrap_or_default()
}

/// Names introduced by an import statement, in source order. For aliased
/// imports this is the imported name, not the alias.
fn imported_names(node: TsNode, source: &[u8]) -> Vec<String> {
    let mut cursor = node.walk();
    let mut names: Vec<String> = node
        .children_by_field_name("name", &mut cursor)
        .filter_map(|n| match n.kind() {
            "aliased_import" => n
                .child_by_field_name("name")
                .map(|inner| node_text(inner, source).to_string()),
            _ => Some(node_text(n, source).to_string()),
        })
        .collect();

    let mut cursor = node.walk();
    if node
        .named_children(&mut cursor)
        .any(|c| c.kind() == "wildcard_import")
    {
        names.push("*".to_string());
    }
    names
}

/// Docstring of a module or definition body: the first statement, when it
/// is a lone plain string literal with non-blank content.
fn leading_docstring(body: TsNode, source: &[u8]) -> Option<String> {
    let mut cursor = body.walk();
    let first = body.named_children(&mut cursor).find(|c| !is_trivia(c))?;
    if first.kind() != "expression_statement" {
        return None;
    }

    let mut cursor = first.walk();
    let exprs: Vec<TsNode> = first
        .named_children(&mut cursor)
        .filter(|c| !is_trivia(c))
        .collect();
    if exprs.len() != 1 {
        return None;
    }

    let value = string_value(exprs[0], source)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Raw content of a plain string literal or implicit concatenation of them.
/// f-strings and bytes literals yield `None`.
fn string_value(node: TsNode, source: &[u8]) -> Option<String> {
    match node.kind() {
        "string" => literal_content(node_text(node, source)),
        "concatenated_string" => {
            let mut cursor = node.walk();
            let mut value = String::new();
            for part in node.named_children(&mut cursor).filter(|c| c.kind() == "string") {
                value.push_str(&literal_content(node_text(part, source))?);
            }
            Some(value)
        }
        _ => None,
    }
}

fn literal_content(text: &str) -> Option<String> {
    let quote_at = text.find(&['"', '\''][..])?;
    let prefix = &text[..quote_at];
    if prefix.chars().any(|c| matches!(c, 'f' | 'F' | 'b' | 'B')) {
        return None;
    }
    let raw = prefix.chars().any(|c| matches!(c, 'r' | 'R'));

    let quoted = &text[quote_at..];
    let quote_len = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
        3
    } else {
        1
    };
    if quoted.len() < quote_len * 2 {
        return Some(String::new());
    }
    let body = &quoted[quote_len..quoted.len() - quote_len];
    if raw {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

/// Apply Python string escapes. Unknown escapes keep their backslash, and
/// named escapes (`\N{...}`) are kept verbatim.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push('\\');
            break;
        };
        match escape {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            '\\' | '\'' | '"' => out.push(escape),
            '0'..='7' => {
                let mut digits = escape.to_string();
                while digits.len() < 3 {
                    match chars.next_if(|d| ('0'..='7').contains(d)) {
                        Some(d) => digits.push(d),
                        None => break,
                    }
                }
                push_code(&mut out, &digits, 8, escape);
            }
            'x' | 'u' | 'U' => {
                let width = match escape {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = (0..width)
                    .map_while(|_| chars.next_if(char::is_ascii_hexdigit))
                    .collect();
                if digits.len() == width {
                    push_code(&mut out, &digits, 16, escape);
                } else {
                    out.push('\\');
                    out.push(escape);
                    out.push_str(&digits);
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

fn push_code(out: &mut String, digits: &str, radix: u32, escape: char) {
    match u32::from_str_radix(digits, radix).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push('\\');
            if radix == 16 {
                out.push(escape);
            }
            out.push_str(digits);
        }
    }
}
