//! Stub emitter.
//!
//! Turns a [`SourceCatalogue`] into a pytest module of placeholder tests.
//! No analysis happens here: the catalogue is flattened into small view
//! structs and handed to the `test_module.py` askama template.

use askama::Template;
use stubsmith_core::{ClassRecord, FunctionRecord, MethodRecord, RouteRecord, SourceCatalogue};

use crate::error::OpsResult;

/// Inputs that are not part of the catalogue itself.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Importable module name, usually the source file stem.
    pub module: String,
    /// Source file name shown in the module docstring.
    pub source_name: String,
    /// Emit the test-client fixture even when no routes were found.
    pub fastapi: bool,
}

impl EmitOptions {
    pub fn new(module: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            source_name: source_name.into(),
            fastapi: false,
        }
    }

    /// Force FastAPI client scaffolding.
    pub fn with_fastapi(mut self, fastapi: bool) -> Self {
        self.fastapi = fastapi;
        self
    }
}

/// Render the full test module for a catalogue.
pub fn render_test_module(catalogue: &SourceCatalogue, options: &EmitOptions) -> OpsResult<String> {
    let template = TestModuleTemplate {
        module: &options.module,
        source_name: &options.source_name,
        fastapi: options.fastapi || catalogue.has_routes(),
        functions: catalogue.functions.iter().map(FunctionView::from).collect(),
        routes: catalogue.routes.iter().map(RouteView::from).collect(),
        classes: catalogue.classes.iter().map(ClassView::from).collect(),
    };

    let mut rendered = template.render()?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Askama template for the generated pytest module.
#[derive(Template)]
#[template(path = "test_module.py", escape = "none")]
struct TestModuleTemplate<'a> {
    module: &'a str,
    source_name: &'a str,
    fastapi: bool,
    functions: Vec<FunctionView<'a>>,
    routes: Vec<RouteView<'a>>,
    classes: Vec<ClassView<'a>>,
}

struct FunctionView<'a> {
    name: &'a str,
    args: String,
    /// Decorator lines placed above the test, already formatted.
    marks: Vec<String>,
    def_prefix: &'static str,
    await_prefix: &'static str,
}

impl<'a> From<&'a FunctionRecord> for FunctionView<'a> {
    fn from(func: &'a FunctionRecord) -> Self {
        let mut marks = Vec::new();
        if !func.params.is_empty() {
            let placeholders = vec!["None"; func.params.len()].join(", ");
            marks.push(format!(
                "@pytest.mark.parametrize(\"{}\", [({})])",
                func.params.join(", "),
                placeholders
            ));
        }
        if func.is_async {
            marks.push("@pytest.mark.asyncio".to_string());
        }

        Self {
            name: &func.name,
            args: func.params.join(", "),
            marks,
            def_prefix: async_prefix(func.is_async),
            await_prefix: await_prefix(func.is_async),
        }
    }
}

struct RouteView<'a> {
    name: &'a str,
    verb: &'static str,
    is_async: bool,
}

impl<'a> From<&'a RouteRecord> for RouteView<'a> {
    fn from(route: &'a RouteRecord) -> Self {
        Self {
            name: route.name(),
            verb: route.verb.as_str(),
            is_async: route.is_async(),
        }
    }
}

struct ClassView<'a> {
    name: &'a str,
    methods: Vec<MethodView<'a>>,
}

impl<'a> From<&'a ClassRecord> for ClassView<'a> {
    fn from(class: &'a ClassRecord) -> Self {
        Self {
            name: &class.name,
            methods: class
                .methods
                .iter()
                .filter(|m| m.is_public())
                .map(MethodView::from)
                .collect(),
        }
    }
}

struct MethodView<'a> {
    name: &'a str,
    args: String,
    /// `", a, b"`, appended after the `instance` fixture parameter.
    extra_params: String,
    is_async: bool,
    await_prefix: &'static str,
}

impl<'a> From<&'a MethodRecord> for MethodView<'a> {
    fn from(method: &'a MethodRecord) -> Self {
        let args = method.params.join(", ");
        let extra_params = if args.is_empty() {
            String::new()
        } else {
            format!(", {}", args)
        };
        Self {
            name: &method.name,
            args,
            extra_params,
            is_async: method.is_async,
            await_prefix: await_prefix(method.is_async),
        }
    }
}

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Whether `name` can appear as `import <name>` in Python 3.
pub(crate) fn is_importable_module(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && !PYTHON_KEYWORDS.contains(&name)
}

fn async_prefix(is_async: bool) -> &'static str {
    if is_async {
        "async "
    } else {
        ""
    }
}

fn await_prefix(is_async: bool) -> &'static str {
    if is_async {
        "await "
    } else {
        ""
    }
}
