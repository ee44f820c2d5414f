//! Scan command implementation.
//!
//! Prints the catalogue of a Python file without writing anything.

use std::path::PathBuf;

use anyhow::{Context, Result};
use stubsmith_core::SourceCatalogue;
use stubsmith_ops::{OpsContext, ScanRequest};

/// Execute the scan command.
pub fn execute(ctx: &OpsContext, source: PathBuf, json: bool) -> Result<()> {
    let response = ctx.scan(ScanRequest::new(source))?;

    if json {
        let out = serde_json::to_string_pretty(&response.catalogue)
            .with_context(|| "Failed to serialize catalogue to JSON")?;
        println!("{}", out);
        return Ok(());
    }

    println!("📄 {}", response.path.display());
    println!("{:─<50}", "");
    print_catalogue(&response.catalogue);
    Ok(())
}

fn print_catalogue(catalogue: &SourceCatalogue) {
    if catalogue.is_empty() {
        println!("No functions, classes or routes found");
        return;
    }

    if !catalogue.routes.is_empty() {
        println!("\n🌐 Routes:");
        for route in &catalogue.routes {
            let function = &route.function;
            println!(
                "   {:<7} {}{}({})  line {}",
                route.verb.as_str().to_uppercase(),
                if function.is_async { "async " } else { "" },
                function.name,
                function.params.join(", "),
                function.line
            );
        }
    }

    if !catalogue.functions.is_empty() {
        println!("\n🔧 Functions:");
        for function in &catalogue.functions {
            println!(
                "   {}{}({})  line {}{}",
                if function.is_async { "async " } else { "" },
                function.name,
                function.params.join(", "),
                function.line,
                if function.has_return { "" } else { "  (no return value)" }
            );
        }
    }

    if !catalogue.classes.is_empty() {
        println!("\n📦 Classes:");
        for class in &catalogue.classes {
            println!("   {} ({} methods)", class.name, class.methods.len());
            for method in &class.methods {
                println!(
                    "     • {}{}({})",
                    if method.is_async { "async " } else { "" },
                    method.name,
                    method.params.join(", ")
                );
            }
        }
    }
}
