//! Checks for source the tree-sitter grammar recovers from silently but
//! Python rejects: indentation, empty suites and a few statement forms.
//!
//! Runs after the `ERROR`/`MISSING` scan, over a tree that has neither.

use tree_sitter::{Node as TsNode, Point};

use super::python::is_trivia;

/// First structural problem in document order.
pub(super) fn first_problem(root: TsNode, source: &[u8]) -> Option<(Point, String)> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if let Some(problem) = check(node, source) {
            return Some(problem);
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

fn check(node: TsNode, source: &[u8]) -> Option<(Point, String)> {
    match node.kind() {
        "module" => check_alignment(&statements(node), 0, source),
        "block" => check_block(node, source),
        "function_definition" | "class_definition" => check_has_body(node),
        "parameters" | "lambda_parameters" => check_parameter_order(node),
        "expression_statement" => check_bare_walrus(node),
        "for_in_clause" => check_comprehension_source(node),
        "delete_statement" => check_delete_targets(node),
        _ => None,
    }
}

fn statements<'t>(node: TsNode<'t>) -> Vec<TsNode<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| !is_trivia(c))
        .collect()
}

/// Whether only whitespace precedes `node` on its first line.
fn begins_line(node: TsNode, source: &[u8]) -> bool {
    let start = node.start_byte();
    let line_start = start - node.start_position().column;
    source[line_start..start]
        .iter()
        .all(|b| matches!(b, b' ' | b'\t' | b'\x0c'))
}

/// Statements that begin a line must all start at `column`.
fn check_alignment(stmts: &[TsNode], column: usize, source: &[u8]) -> Option<(Point, String)> {
    let stmt = stmts
        .iter()
        .find(|s| begins_line(**s, source) && s.start_position().column != column)?;
    let message = if stmt.start_position().column > column {
        "unexpected indent"
    } else {
        "unindent does not match any outer indentation level"
    };
    Some((stmt.start_position(), message.to_string()))
}

fn check_block(block: TsNode, source: &[u8]) -> Option<(Point, String)> {
    let header = block.parent()?;
    let colon_row = header_end_row(block, header);
    let stmts = statements(block);

    let Some(first) = stmts.first() else {
        return Some((
            Point {
                row: colon_row + 1,
                column: 0,
            },
            expected_block(header),
        ));
    };

    // `if x: pass` keeps its suite on the header line.
    if first.start_position().row == colon_row {
        return None;
    }

    let column = first.start_position().column;
    if column <= header.start_position().column {
        return Some((first.start_position(), expected_block(header)));
    }
    check_alignment(&stmts, column, source)
}

/// Row of the token that ends the header, normally the `:` before `block`.
fn header_end_row(block: TsNode, header: TsNode) -> usize {
    let mut prev = block.prev_sibling();
    while let Some(node) = prev {
        if !is_trivia(&node) {
            return node.end_position().row;
        }
        prev = node.prev_sibling();
    }
    header.start_position().row
}

fn check_has_body(node: TsNode) -> Option<(Point, String)> {
    if node.child_by_field_name("body").is_some() {
        return None;
    }
    let point = Point {
        row: node.end_position().row + 1,
        column: 0,
    };
    Some((point, expected_block(node)))
}

fn expected_block(header: TsNode) -> String {
    let what = match header.kind() {
        "function_definition" => "function definition",
        "class_definition" => "class definition",
        "if_statement" => "'if' statement",
        "elif_clause" => "'elif' statement",
        "else_clause" => "'else' statement",
        "for_statement" => "'for' statement",
        "while_statement" => "'while' statement",
        "with_statement" => "'with' statement",
        "try_statement" => "'try' statement",
        "except_clause" | "except_group_clause" => "'except' statement",
        "finally_clause" => "'finally' statement",
        "match_statement" => "'match' statement",
        "case_clause" => "'case' statement",
        _ => "statement",
    };
    format!(
        "expected an indented block after {} on line {}",
        what,
        header.start_position().row + 1
    )
}

fn check_parameter_order(params: TsNode) -> Option<(Point, String)> {
    let mut seen_default = false;
    let mut cursor = params.walk();
    for param in params.children(&mut cursor) {
        match param.kind() {
            "default_parameter" | "typed_default_parameter" => seen_default = true,
            // Everything after a bare `*` or a splat is keyword-only.
            "*" | "**" | "list_splat_pattern" | "dictionary_splat_pattern"
            | "keyword_separator" => break,
            // `*args: int` is a typed parameter wrapping a splat.
            "typed_parameter" if is_splat(param) => break,
            "identifier" | "typed_parameter" if seen_default => {
                return Some((
                    param.start_position(),
                    "parameter without a default follows parameter with a default".to_string(),
                ));
            }
            _ => {}
        }
    }
    None
}

fn is_splat(param: TsNode) -> bool {
    param
        .named_child(0)
        .map(|c| matches!(c.kind(), "list_splat_pattern" | "dictionary_splat_pattern"))
        .unwrap_or(false)
}

/// `x := 1` is only valid inside parentheses.
fn check_bare_walrus(stmt: TsNode) -> Option<(Point, String)> {
    statements(stmt)
        .into_iter()
        .find(|c| c.kind() == "named_expression")
        .map(|c| (c.start_position(), "invalid syntax".to_string()))
}

/// `(x for x in a, b)` reads as one source `a, b` to the grammar; Python
/// only allows a single expression there.
fn check_comprehension_source(clause: TsNode) -> Option<(Point, String)> {
    let mut cursor = clause.walk();
    let extra = clause
        .children_by_field_name("right", &mut cursor)
        .filter(|n| n.is_named())
        .nth(1)?;

    let in_call = clause
        .parent()
        .filter(|p| p.kind() == "generator_expression")
        .and_then(|p| p.parent())
        .map(|p| p.kind() == "call")
        .unwrap_or(false);
    let message = if in_call {
        "Generator expression must be parenthesized"
    } else {
        "invalid syntax"
    };
    Some((extra.start_position(), message.to_string()))
}

fn check_delete_targets(stmt: TsNode) -> Option<(Point, String)> {
    let target = statements(stmt).into_iter().find_map(invalid_delete_target)?;
    let message = if target.kind() == "call" {
        "cannot delete function call"
    } else {
        "cannot delete expression"
    };
    Some((target.start_position(), message.to_string()))
}

fn invalid_delete_target(node: TsNode) -> Option<TsNode> {
    match node.kind() {
        "identifier" | "attribute" | "subscript" => None,
        "expression_list" | "tuple" | "list" | "parenthesized_expression" | "pattern_list"
        | "tuple_pattern" | "list_pattern" => {
            statements(node).into_iter().find_map(invalid_delete_target)
        }
        _ => Some(node),
    }
}
