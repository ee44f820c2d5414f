use tree_sitter::Node;
use tracing::debug;

use super::text;

/// Normalized names of every `decorator` child of a `decorated_definition`.
///
/// Keeps one entry per decorator, in source order. Shapes the normalizer
/// does not support come back as `""` so they never match a route verb.
pub(super) fn extract_decorators(definition: Node, src: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = definition.walk();
    for child in definition.named_children(&mut cursor) {
        if child.kind() != "decorator" {
            continue;
        }
        let mut inner = child.walk();
        let name = child
            .named_children(&mut inner)
            .find(|n| n.kind() != "comment")
            .and_then(|expr| decorator_name(expr, src));
        match name {
            Some(name) => names.push(name),
            None => {
                debug!(
                    line = child.start_position().row + 1,
                    decorator = text(child, src),
                    "Unsupported decorator shape"
                );
                names.push(String::new());
            }
        }
    }
    names
}

/// Normalize a decorator expression to a dotted name.
///
/// - `name` → `"name"`
/// - `obj.attr` → `"obj.attr"` when `obj` is a bare identifier
/// - `callee(...)` → the name of `callee`, arguments discarded
///
/// Anything else (deeper attribute chains, subscripts, calls of calls)
/// yields `None`.
pub(super) fn decorator_name(expr: Node, src: &[u8]) -> Option<String> {
    match expr.kind() {
        "call" => {
            let callee = expr.child_by_field_name("function")?;
            match callee.kind() {
                "identifier" | "attribute" => decorator_name(callee, src),
                _ => None,
            }
        }
        _ => simple_name(expr, src),
    }
}

fn simple_name(expr: Node, src: &[u8]) -> Option<String> {
    match expr.kind() {
        "identifier" => Some(text(expr, src).to_string()),
        "attribute" => {
            let object = expr.child_by_field_name("object")?;
            let attribute = expr.child_by_field_name("attribute")?;
            if object.kind() != "identifier" {
                return None;
            }
            Some(format!("{}.{}", text(object, src), text(attribute, src)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    /// Parse `source` and return the decorator names of its first definition.
    fn decorators_of(source: &str) -> Vec<String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(source, None).unwrap();
        let root = tree.root_node();
        let definition = root.named_child(0).unwrap();
        assert_eq!(definition.kind(), "decorated_definition");
        extract_decorators(definition, source.as_bytes())
    }

    #[test]
    fn test_bare_identifier() {
        assert_eq!(decorators_of("@staticmethod\ndef f():\n    pass\n"), ["staticmethod"]);
    }

    #[test]
    fn test_attribute_access() {
        assert_eq!(decorators_of("@app.get\ndef f():\n    pass\n"), ["app.get"]);
    }

    #[test]
    fn test_call_wrapping_attribute_drops_arguments() {
        assert_eq!(
            decorators_of("@app.get(\"/x\", status_code=200)\ndef f():\n    pass\n"),
            ["app.get"]
        );
    }

    #[test]
    fn test_call_wrapping_name() {
        assert_eq!(
            decorators_of("@lru_cache(maxsize=None)\ndef f():\n    pass\n"),
            ["lru_cache"]
        );
    }

    #[test]
    fn test_unsupported_shapes_degrade_to_empty() {
        let names = decorators_of(
            "@app.api.get(\"/x\")\n@handlers[0]\n@factory()()\n@ok\ndef f():\n    pass\n",
        );
        assert_eq!(names, ["", "", "", "ok"]);
    }
}
