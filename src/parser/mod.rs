//! Python parsing into an owned, closed syntax tree.
//!
//! This module provides:
//! - `SyntaxTree` / `Node`: the lowered tree every detector consumes
//! - `NodeKind`: the closed set of constructs detectors care about
//! - `Walk`: a lazy depth-first pre-order traversal
//! - `parse`: tree-sitter backed parsing (see `python.rs`)

use std::fmt;

use serde::{Deserialize, Serialize};

mod python;
mod structure;

pub use python::parse;

/// Structured description of why a source unit failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxErrorDescriptor {
    /// Line of the first offending token (1-indexed).
    pub line: usize,
    /// Column of the first offending token (1-indexed).
    pub column: usize,
    pub message: String,
    /// The trimmed source line containing the error.
    pub offending_text: String,
}

impl fmt::Display for SyntaxErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// The constructs detectors distinguish. Everything else is `Other`,
/// tagged with its grammar kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Module {
        docstring: Option<String>,
    },
    FunctionDef {
        name: String,
        is_async: bool,
        docstring: Option<String>,
    },
    ClassDef {
        name: String,
        docstring: Option<String>,
    },
    /// A `try` statement and the number of `except` clauses it declares.
    Try {
        handlers: usize,
    },
    ExceptHandler,
    /// `import a, b.c as d` - names are the imported modules, in order.
    Import {
        names: Vec<String>,
    },
    /// `from m import a, b`
    ImportFrom {
        module: Option<String>,
        names: Vec<String>,
    },
    Other(&'static str),
}

impl NodeKind {
    /// Short label for logging and debugging.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Module { .. } => "module",
            NodeKind::FunctionDef { .. } => "function",
            NodeKind::ClassDef { .. } => "class",
            NodeKind::Try { .. } => "try",
            NodeKind::ExceptHandler => "except",
            NodeKind::Import { .. } => "import",
            NodeKind::ImportFrom { .. } => "import_from",
            NodeKind::Other(kind) => *kind,
        }
    }
}

/// A node of the lowered syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Start line (1-indexed).
    pub line: usize,
    /// Start column (1-indexed, bytes).
    pub column: usize,
    pub children: Vec<Node>,
}

impl Node {
    /// Name of a function or class definition.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::FunctionDef { name, .. } | NodeKind::ClassDef { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Docstring attached to a module, function or class.
    pub fn docstring(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Module { docstring }
            | NodeKind::FunctionDef { docstring, .. }
            | NodeKind::ClassDef { docstring, .. } => docstring.as_deref(),
            _ => None,
        }
    }

    /// Depth-first pre-order walk over this node and all its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Largest start line found anywhere in this subtree, this node included.
    pub fn max_line(&self) -> usize {
        self.walk().map(|n| n.line).max().unwrap_or(self.line)
    }
}

/// The parsed form of one source unit. Immutable once built.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    root: Node,
}

impl SyntaxTree {
    pub(crate) fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Walk every node in document order. Each call starts a fresh traversal.
    pub fn walk(&self) -> Walk<'_> {
        self.root.walk()
    }

    /// All function definitions, nested ones included, in document order.
    pub fn functions(&self) -> impl Iterator<Item = &Node> {
        self.walk()
            .filter(|n| matches!(n.kind, NodeKind::FunctionDef { .. }))
    }
}

/// Lazy depth-first pre-order iterator over a subtree.
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
