//! Core domain types shared across the stubsmith workspace.
//!
//! A [`SourceCatalogue`] is the normalized summary of one Python module:
//! its plain functions, its classes with their immediate methods, and its
//! web-route handlers. Records are built once by the scanner and never
//! mutated afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// HTTP verbs
// =============================================================================

/// HTTP verb a route handler is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

/// Verbs recognized as route markers when they trail a decorator name
/// (`app.get`, `router.post`, ...).
pub const ROUTE_VERBS: [HttpVerb; 5] = [
    HttpVerb::Get,
    HttpVerb::Post,
    HttpVerb::Put,
    HttpVerb::Delete,
    HttpVerb::Patch,
];

impl HttpVerb {
    /// Lowercase method name, as used by test clients (`client.get(...)`).
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Delete => "delete",
            HttpVerb::Patch => "patch",
        }
    }

    /// Resolve the verb bound by a normalized decorator name.
    ///
    /// Matches `<object>.<verb>` where `<object>` is non-empty and `<verb>`
    /// is one of [`ROUTE_VERBS`]. The comparison is case-sensitive.
    pub fn from_decorator(name: &str) -> Option<Self> {
        let (object, verb) = name.rsplit_once('.')?;
        if object.is_empty() {
            return None;
        }
        ROUTE_VERBS.iter().copied().find(|v| v.as_str() == verb)
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ROUTE_VERBS
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("Unknown HTTP verb: {}", s))
    }
}

// =============================================================================
// Records
// =============================================================================

/// A function or async function definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Declared name.
    pub name: String,
    /// Positional parameter names, in declaration order.
    pub params: Vec<String>,
    /// Declared with `async def`.
    pub is_async: bool,
    /// Some `return <value>` appears anywhere in the body.
    pub has_return: bool,
    /// Normalized decorator names. Unsupported shapes are kept as `""`.
    pub decorators: Vec<String>,
    /// 1-based line of the `def` keyword.
    pub line: usize,
}

impl FunctionRecord {
    /// The verb of the first decorator that marks this function as a route.
    pub fn route_verb(&self) -> Option<HttpVerb> {
        self.decorators
            .iter()
            .find_map(|d| HttpVerb::from_decorator(d))
    }
}

/// A function defined directly inside a class body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRecord {
    pub name: String,
    /// Parameter names without the leading instance reference.
    pub params: Vec<String>,
    pub is_async: bool,
}

impl MethodRecord {
    /// Private helpers start with `_`; `__init__` is treated as public.
    pub fn is_public(&self) -> bool {
        !self.name.starts_with('_') || self.name == "__init__"
    }
}

/// A class definition and its immediate methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    pub methods: Vec<MethodRecord>,
}

/// A function bound to an HTTP verb through a routing decorator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(flatten)]
    pub function: FunctionRecord,
    pub verb: HttpVerb,
}

impl RouteRecord {
    /// Wrap `function` as a route if one of its decorators names a verb.
    pub fn classify(function: FunctionRecord) -> Result<Self, FunctionRecord> {
        match function.route_verb() {
            Some(verb) => Ok(Self { function, verb }),
            None => Err(function),
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    pub fn is_async(&self) -> bool {
        self.function.is_async
    }
}

// =============================================================================
// Catalogue
// =============================================================================

/// Everything the scanner found in one source file, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCatalogue {
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
    pub routes: Vec<RouteRecord>,
}

impl SourceCatalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// File a function under `routes` or `functions`, never both.
    pub fn add_function(&mut self, function: FunctionRecord) {
        match RouteRecord::classify(function) {
            Ok(route) => self.routes.push(route),
            Err(function) => self.functions.push(function),
        }
    }

    pub fn add_class(&mut self, class: ClassRecord) {
        self.classes.push(class);
    }

    /// True when no definitions were found.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.classes.is_empty() && self.routes.is_empty()
    }

    /// Whether the module defines any route handlers.
    pub fn has_routes(&self) -> bool {
        !self.routes.is_empty()
    }

    /// Total number of function definitions, routes included.
    pub fn callable_count(&self) -> usize {
        self.functions.len() + self.routes.len()
    }

    /// Look up a plain function by name.
    pub fn function(&self, name: &str) -> Option<&FunctionRecord> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Look up a route handler by name.
    pub fn route(&self, name: &str) -> Option<&RouteRecord> {
        self.routes.iter().find(|r| r.name() == name)
    }

    /// Look up a class by name.
    pub fn class(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.iter().find(|c| c.name == name)
    }
}
