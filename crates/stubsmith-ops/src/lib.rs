//! Stubsmith Operations Layer
//!
//! This crate provides a typed API for every stubsmith operation: scanning a
//! Python module into a catalogue, writing pytest stubs for it, and creating
//! FastAPI projects from bundled templates. The CLI is a thin shell around it.
//!
//! ## Architecture
//!
//! - **Requests**: Typed input DTOs for each operation
//! - **Responses**: Typed output DTOs with all relevant data
//! - **OpsContext**: The service that executes operations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stubsmith_ops::{Config, GenerateTestsRequest, OpsContext};
//!
//! fn main() -> Result<(), stubsmith_ops::OpsError> {
//!     let ctx = OpsContext::new(Config::load()?);
//!
//!     let request = GenerateTestsRequest::new("app/main.py").fastapi();
//!     let response = ctx.generate_tests(request)?;
//!
//!     println!("Wrote {}", response.output_path.display());
//!     Ok(())
//! }
//! ```

mod config;
mod context;
mod emit;
mod error;
mod requests;
mod responses;
mod scaffold;
mod scanner;

// Re-export public API
pub use config::Config;
pub use context::OpsContext;
pub use emit::{render_test_module, EmitOptions};
pub use error::{OpsError, OpsResult};
pub use requests::*;
pub use responses::*;
pub use scaffold::{create_project, ProjectTemplate, TemplateSource};
pub use scanner::{scan_source, ScanError, SyntaxError};
