//! Source signature scanner.
//!
//! Parses Python source with tree-sitter and walks the tree once, depth
//! first, collecting a [`SourceCatalogue`]:
//!
//! - every `def` / `async def` becomes a [`FunctionRecord`], filed as a route
//!   when one of its decorators is `<object>.<verb>`;
//! - every `class` becomes a [`ClassRecord`] holding the functions defined
//!   directly in its body;
//! - function and class bodies are walked further, so nested definitions are
//!   recorded by the same rules.
//!
//! The scanner never executes anything and keeps no state between calls.
//! Source that does not parse is rejected as a whole.

mod decorators;

use stubsmith_core::{ClassRecord, FunctionRecord, MethodRecord, SourceCatalogue};
use thiserror::Error;
use tree_sitter::{Node, Parser};

use decorators::extract_decorators;

/// Position and description of the first syntax error in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line}, column {column})")]
pub struct SyntaxError {
    pub message: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in bytes.
    pub column: usize,
}

/// Failures of a single scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The text is not valid Python.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The parser itself could not run.
    #[error("Python parser unavailable: {0}")]
    Parser(String),
}

/// Scan Python source text into a catalogue.
pub fn scan_source(source: &str) -> Result<SourceCatalogue, ScanError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ScanError::Parser(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ScanError::Parser("parse was cancelled".to_string()))?;

    let src = source.as_bytes();
    let root = tree.root_node();
    if root.has_error() {
        return Err(syntax_error(root, src).into());
    }
    if let Some(statement) = python2_statement(root) {
        return Err(python2_error(statement).into());
    }

    let mut scanner = Scanner {
        src,
        catalogue: SourceCatalogue::new(),
    };
    scanner.visit_children(root);
    Ok(scanner.catalogue)
}

struct Scanner<'a> {
    src: &'a [u8],
    catalogue: SourceCatalogue,
}

impl Scanner<'_> {
    fn visit_children(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child, false);
        }
    }

    /// Dispatch on node kind. `in_class_body` is true only for the direct
    /// children of a class body, which is what makes a function a method.
    fn visit(&mut self, node: Node, in_class_body: bool) {
        match node.kind() {
            "function_definition" => self.visit_function(node, Vec::new(), in_class_body),
            "class_definition" => self.visit_class(node),
            "decorated_definition" => {
                let Some(definition) = node.child_by_field_name("definition") else {
                    return;
                };
                match definition.kind() {
                    "function_definition" => {
                        let decorators = extract_decorators(node, self.src);
                        self.visit_function(definition, decorators, in_class_body);
                    }
                    "class_definition" => self.visit_class(definition),
                    _ => self.visit_children(definition),
                }
            }
            _ => self.visit_children(node),
        }
    }

    fn visit_function(&mut self, node: Node, decorators: Vec<String>, is_method: bool) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let mut params = positional_params(node, self.src);
        if is_method && !params.is_empty() {
            params.remove(0);
        }

        let body = node.child_by_field_name("body");
        self.catalogue.add_function(FunctionRecord {
            name: text(name, self.src).to_string(),
            params,
            is_async: is_async(node),
            has_return: body.is_some_and(returns_value),
            decorators,
            line: node.start_position().row + 1,
        });

        if let Some(body) = body {
            self.visit_children(body);
        }
    }

    fn visit_class(&mut self, node: Node) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let body = node.child_by_field_name("body");

        let mut methods = Vec::new();
        if let Some(body) = body {
            let mut cursor = body.walk();
            for item in body.named_children(&mut cursor) {
                if let Some(method) = method_record(item, self.src) {
                    methods.push(method);
                }
            }
        }

        self.catalogue.add_class(ClassRecord {
            name: text(name, self.src).to_string(),
            methods,
        });

        if let Some(body) = body {
            let mut cursor = body.walk();
            for item in body.named_children(&mut cursor) {
                self.visit(item, true);
            }
        }
    }
}

/// Build a method record for a function defined directly in a class body.
fn method_record(item: Node, src: &[u8]) -> Option<MethodRecord> {
    let function = match item.kind() {
        "function_definition" => item,
        "decorated_definition" => item
            .child_by_field_name("definition")
            .filter(|d| d.kind() == "function_definition")?,
        _ => return None,
    };
    let name = function.child_by_field_name("name")?;
    let mut params = positional_params(function, src);
    if !params.is_empty() {
        params.remove(0);
    }
    Some(MethodRecord {
        name: text(name, src).to_string(),
        params,
        is_async: is_async(function),
    })
}

/// Names of the parameters that can be passed positionally.
///
/// Collection stops at the first `*`, `*args` or `**kwargs`; everything after
/// it is keyword-only.
fn positional_params(function: Node, src: &[u8]) -> Vec<String> {
    let Some(parameters) = function.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut names = Vec::new();
    let mut cursor = parameters.walk();
    for param in parameters.named_children(&mut cursor) {
        let name = match param.kind() {
            "identifier" => Some(param),
            "default_parameter" | "typed_default_parameter" => param
                .child_by_field_name("name")
                .filter(|n| n.kind() == "identifier"),
            "typed_parameter" => match param.named_child(0) {
                Some(inner) if inner.kind() == "identifier" => Some(inner),
                // `*args: int` / `**kwargs: str`
                _ => break,
            },
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            _ => None,
        };
        if let Some(name) = name {
            names.push(text(name, src).to_string());
        }
    }
    names
}

fn is_async(function: Node) -> bool {
    let mut cursor = function.walk();
    let first = function.children(&mut cursor).next();
    first.is_some_and(|token| token.kind() == "async")
}

/// Whether any `return <value>` appears below `node`.
fn returns_value(node: Node) -> bool {
    if node.kind() == "return_statement" {
        let mut cursor = node.walk();
        let carries_value = node
            .named_children(&mut cursor)
            .any(|child| child.kind() != "comment");
        if carries_value {
            return true;
        }
    }
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).any(returns_value);
    found
}

/// Locate the first error or missing node and describe it.
fn syntax_error(root: Node, src: &[u8]) -> SyntaxError {
    let Some(node) = first_error(root) else {
        return SyntaxError {
            message: "invalid syntax".to_string(),
            line: 1,
            column: 1,
        };
    };

    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let snippet: String = text(node, src)
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .chars()
            .take(40)
            .collect();
        if snippet.is_empty() {
            "invalid syntax".to_string()
        } else {
            format!("invalid syntax near `{}`", snippet)
        }
    };

    let position = node.start_position();
    SyntaxError {
        message,
        line: position.row + 1,
        column: position.column + 1,
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}

/// The grammar still accepts Python 2 `print x` and `exec code` statements
/// without flagging an error. Python 3 rejects both.
fn python2_statement(node: Node) -> Option<Node> {
    if matches!(node.kind(), "print_statement" | "exec_statement") {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find_map(python2_statement);
    found
}

fn python2_error(statement: Node) -> SyntaxError {
    let keyword = match statement.kind() {
        "print_statement" => "print",
        _ => "exec",
    };
    let position = statement.start_position();
    SyntaxError {
        message: format!("Missing parentheses in call to '{}'", keyword),
        line: position.row + 1,
        column: position.column + 1,
    }
}

/// Source text of a node. Tree-sitter ranges always fall on UTF-8
/// boundaries of the `&str` we parsed, so the fallback is never hit.
pub(crate) fn text<'a>(node: Node, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use stubsmith_core::HttpVerb;

    fn scan(source: &str) -> SourceCatalogue {
        scan_source(source).expect("source should scan")
    }

    #[test]
    fn test_empty_module_yields_empty_catalogue() {
        let catalogue = scan("\"\"\"Just a docstring.\"\"\"\nimport os\n\nVALUE = 3\n");
        assert!(catalogue.is_empty());
        assert!(catalogue.functions.is_empty());
        assert!(catalogue.classes.is_empty());
        assert!(catalogue.routes.is_empty());
    }

    #[test]
    fn test_simple_function_record() {
        let catalogue = scan("def add(a, b):\n    return a + b\n");

        assert_eq!(catalogue.functions.len(), 1);
        let add = &catalogue.functions[0];
        assert_eq!(add.name, "add");
        assert_eq!(add.params, ["a", "b"]);
        assert!(!add.is_async);
        assert!(add.has_return);
        assert!(add.decorators.is_empty());
        assert_eq!(add.line, 1);
    }

    #[test]
    fn test_bare_return_does_not_count() {
        let catalogue = scan(
            "def stop(flag):\n    if flag:\n        return\n    print(flag)\n",
        );
        assert!(!catalogue.functions[0].has_return);
    }

    #[test]
    fn test_nested_return_counts() {
        let catalogue = scan(
            "def pick(items):\n    for item in items:\n        if item:\n            return item\n",
        );
        assert!(catalogue.functions[0].has_return);
    }

    #[test]
    fn test_parameter_kinds() {
        let catalogue = scan(
            "def f(a, b: int, c=1, d: str = 'x', /, e=2, *args, g, **kwargs):\n    pass\n\n\
             def g(x, *, y):\n    pass\n\n\
             def h(p, *rest: int):\n    pass\n",
        );
        assert_eq!(catalogue.function("f").unwrap().params, ["a", "b", "c", "d", "e"]);
        assert_eq!(catalogue.function("g").unwrap().params, ["x"]);
        assert_eq!(catalogue.function("h").unwrap().params, ["p"]);
    }

    #[test]
    fn test_call_and_bare_route_decorators_classify_identically() {
        let catalogue = scan(
            "@app.get(\"/x\")\ndef with_call():\n    return 1\n\n\
             @app.get\ndef bare():\n    return 2\n",
        );

        assert!(catalogue.functions.is_empty());
        assert_eq!(catalogue.routes.len(), 2);
        for route in &catalogue.routes {
            assert_eq!(route.function.decorators, ["app.get"]);
            assert_eq!(route.verb, HttpVerb::Get);
        }
    }

    #[test]
    fn test_async_router_post() {
        let catalogue = scan(
            "@router.post(\"/items\")\nasync def create_item(item):\n    return item\n",
        );

        assert_eq!(catalogue.routes.len(), 1);
        let route = &catalogue.routes[0];
        assert_eq!(route.name(), "create_item");
        assert!(route.is_async());
        assert_eq!(route.verb, HttpVerb::Post);
        assert_eq!(route.function.params, ["item"]);
    }

    #[test]
    fn test_non_route_decorators_stay_functions() {
        let catalogue = scan(
            "@functools.lru_cache(maxsize=None)\ndef cached(n):\n    return n\n\n\
             @app.route(\"/x\")\ndef legacy():\n    pass\n",
        );
        assert_eq!(catalogue.functions.len(), 2);
        assert_eq!(catalogue.function("cached").unwrap().decorators, ["functools.lru_cache"]);
        assert!(catalogue.routes.is_empty());
    }

    #[test]
    fn test_unsupported_decorator_does_not_block_classification() {
        let catalogue = scan(
            "@deps.auth.required\n@app.delete(\"/items/{id}\")\ndef remove(id):\n    return id\n",
        );
        let route = catalogue.route("remove").expect("should be a route");
        assert_eq!(route.function.decorators, ["", "app.delete"]);
        assert_eq!(route.verb, HttpVerb::Delete);
    }

    #[test]
    fn test_init_drops_instance_reference() {
        let catalogue = scan(
            "class Point:\n    def __init__(self, x, y):\n        self.x = x\n        self.y = y\n",
        );

        let point = catalogue.class("Point").unwrap();
        assert_eq!(point.methods.len(), 1);
        assert_eq!(point.methods[0].name, "__init__");
        assert_eq!(point.methods[0].params, ["x", "y"]);
        assert!(!point.methods[0].is_async);
    }

    #[test]
    fn test_class_without_methods_is_recorded() {
        let catalogue = scan("class Empty:\n    pass\n\nclass Model(Base):\n    id: int\n");

        assert_eq!(catalogue.classes.len(), 2);
        assert!(catalogue.class("Empty").unwrap().methods.is_empty());
        assert!(catalogue.class("Model").unwrap().methods.is_empty());
    }

    #[test]
    fn test_methods_are_also_visited_as_functions() {
        let catalogue = scan(
            "class Repo:\n    @staticmethod\n    def build():\n        return Repo()\n\n\
             \x20   async def fetch(self, key):\n        return key\n",
        );

        let repo = catalogue.class("Repo").unwrap();
        let names: Vec<_> = repo.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["build", "fetch"]);
        assert!(repo.methods[1].is_async);
        assert_eq!(repo.methods[1].params, ["key"]);

        let fetch = catalogue.function("fetch").unwrap();
        assert_eq!(fetch.params, ["key"]);
        assert!(fetch.is_async);
        assert_eq!(catalogue.function("build").unwrap().decorators, ["staticmethod"]);
    }

    #[test]
    fn test_nested_functions_are_recorded() {
        let catalogue = scan(
            "def outer(a):\n    def inner(b):\n        return b\n    return inner(a)\n",
        );

        let names: Vec<_> = catalogue.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["outer", "inner"]);
        assert_eq!(catalogue.function("inner").unwrap().params, ["b"]);
        assert_eq!(catalogue.function("inner").unwrap().line, 2);
    }

    #[test]
    fn test_nested_function_in_method_keeps_first_param() {
        let catalogue = scan(
            "class Service:\n    def run(self, job):\n        def step(ctx, value):\n            return value\n        return step\n",
        );
        assert_eq!(catalogue.function("run").unwrap().params, ["job"]);
        assert_eq!(catalogue.function("step").unwrap().params, ["ctx", "value"]);
        assert_eq!(catalogue.class("Service").unwrap().methods.len(), 1);
    }

    #[test]
    fn test_nested_classes_are_recorded_once() {
        let catalogue = scan(
            "class Outer:\n    class Meta:\n        ordering = ['id']\n\n    def save(self):\n        pass\n",
        );
        let names: Vec<_> = catalogue.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Outer", "Meta"]);
        assert_eq!(catalogue.class("Outer").unwrap().methods.len(), 1);
    }

    #[test]
    fn test_definitions_inside_control_flow() {
        let catalogue = scan(
            "if True:\n    def maybe():\n        return 1\nelse:\n    class Fallback:\n        pass\n",
        );
        assert!(catalogue.function("maybe").is_some());
        assert!(catalogue.class("Fallback").is_some());
    }

    #[test]
    fn test_functions_and_routes_partition_all_definitions() {
        let source = "\
from fastapi import FastAPI, APIRouter
app = FastAPI()
router = APIRouter()

@app.get(\"/todo\")
def todo():
    return []

@app.post(\"/todo\")
def add_todo(todo):
    return todo

@router.put(\"/todo/{item_id}\")
async def update_todo(item_id, todo):
    def merge(a, b):
        return a
    return merge(item_id, todo)

def helper():
    pass

class Store:
    def get(self, key):
        return key
";
        let catalogue = scan(source);

        let mut routes: Vec<_> = catalogue.routes.iter().map(|r| r.name()).collect();
        let mut functions: Vec<_> = catalogue.functions.iter().map(|f| f.name.as_str()).collect();
        routes.sort();
        functions.sort();
        assert_eq!(routes, ["add_todo", "todo", "update_todo"]);
        assert_eq!(functions, ["get", "helper", "merge"]);
        assert_eq!(catalogue.callable_count(), 6);
    }

    #[test]
    fn test_decorated_class_is_recorded() {
        let catalogue = scan(
            "@dataclass\nclass Item:\n    name: str\n\n    def label(self):\n        return self.name\n",
        );
        let item = catalogue.class("Item").unwrap();
        assert_eq!(item.methods[0].name, "label");
        assert!(item.methods[0].params.is_empty());
    }

    #[test]
    fn test_unterminated_string_is_syntax_error() {
        let err = scan_source("def greet():\n    print(\"hello)\n").unwrap_err();
        match err {
            ScanError::Syntax(e) => {
                assert!(e.line >= 1);
                assert!(e.column >= 1);
                assert!(!e.message.is_empty());
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_python2_print_is_syntax_error() {
        let err = scan_source("def f():\n    print \"hello\"\n").unwrap_err();
        match err {
            ScanError::Syntax(e) => {
                assert_eq!(e.line, 2);
                assert_eq!(e.column, 5);
                assert!(e.message.contains("print"));
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_python2_exec_is_syntax_error() {
        let err = scan_source("exec \"x = 1\"\n").unwrap_err();
        assert!(matches!(err, ScanError::Syntax(ref e) if e.message.contains("exec")));
    }

    #[test]
    fn test_print_call_is_accepted() {
        let catalogue = scan("def f():\n    print(\"hello\")\n");
        assert_eq!(catalogue.function("f").unwrap().params, Vec::<String>::new());
    }

    #[test]
    fn test_broken_definition_is_syntax_error() {
        let err = scan_source("def add(a, b\n    return a +\n").unwrap_err();
        assert!(matches!(err, ScanError::Syntax(_)));
        assert!(err.to_string().contains("line"));
    }
}
