//! Missing documentation detection.
//!
//! A module, function or class is documented when the first statement of
//! its body is a plain string literal with non-blank content.

use crate::parser::{NodeKind, SyntaxTree};

use super::{Detector, Issue, IssueKind};

/// Flags a module without a top-level docstring.
pub struct ModuleDocDetector;

impl Detector for ModuleDocDetector {
    fn name(&self) -> &'static str {
        "module_docstring"
    }

    fn detect(&self, tree: &SyntaxTree, _source: &str) -> Vec<Issue> {
        if tree.root().docstring().is_some() {
            return Vec::new();
        }
        vec![Issue::new(
            IssueKind::MissingModuleDoc,
            "Module is missing a top-level docstring",
        )]
    }
}

/// Flags every function and class without a docstring, nested definitions
/// included, in document order.
pub struct DefinitionDocDetector;

impl Detector for DefinitionDocDetector {
    fn name(&self) -> &'static str {
        "definition_docstring"
    }

    fn detect(&self, tree: &SyntaxTree, _source: &str) -> Vec<Issue> {
        tree.walk()
            .filter_map(|node| {
                let (kind, label, name) = match &node.kind {
                    NodeKind::FunctionDef {
                        name,
                        docstring: None,
                        ..
                    } => (IssueKind::MissingFunctionDoc, "function", name),
                    NodeKind::ClassDef {
                        name,
                        docstring: None,
                    } => (IssueKind::MissingClassDoc, "class", name),
                    _ => return None,
                };
                Some(
                    Issue::new(kind, format!("Missing docstring in {} '{}'", label, name))
                        .named(name.as_str())
                        .at(node.line, node.column),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn test_documented_source_has_no_issues() {
        let source = r#""""Module."""

class Service:
    """A service."""

    def start(self):
        """Start it."""

        def inner():
            """Nested helper."""
"#;
        let tree = parser::parse(source).unwrap();
        assert!(ModuleDocDetector.detect(&tree, source).is_empty());
        assert!(DefinitionDocDetector.detect(&tree, source).is_empty());
    }

    #[test]
    fn test_missing_module_doc_has_no_location() {
        let source = "x = 1\n";
        let tree = parser::parse(source).unwrap();
        let issues = ModuleDocDetector.detect(&tree, source);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MissingModuleDoc);
        assert!(issues[0].location.is_none());
    }

    #[test]
    fn test_nested_definitions_are_reported_in_order() {
        let source = r#"
class Outer:
    def method(self):
        def inner():
            pass

async def later():
    pass
"#;
        let tree = parser::parse(source).unwrap();
        let issues = DefinitionDocDetector.detect(&tree, source);

        let found: Vec<_> = issues
            .iter()
            .map(|i| (i.kind, i.name.as_deref().unwrap_or(""), i.line().unwrap_or(0)))
            .collect();
        assert_eq!(
            found,
            vec![
                (IssueKind::MissingClassDoc, "Outer", 2),
                (IssueKind::MissingFunctionDoc, "method", 3),
                (IssueKind::MissingFunctionDoc, "inner", 4),
                (IssueKind::MissingFunctionDoc, "later", 7),
            ]
        );
    }
}
