//! Init command implementation.
//!
//! Creates a FastAPI project from one of the bundled templates.

use std::path::PathBuf;

use anyhow::Result;
use stubsmith_ops::{InitProjectRequest, OpsContext, ProjectTemplate};

/// Execute the init command.
pub fn execute(ctx: &OpsContext, project_name: &str, template: &str, path: PathBuf) -> Result<()> {
    let template: ProjectTemplate = template.parse()?;

    println!("🚀 Creating FastAPI project: {}", project_name);
    println!("   Template: {} - {}", template, template.description());
    println!("   Location: {}", path.join(project_name).display());
    println!();

    let response = ctx.init_project(InitProjectRequest::new(project_name, template).in_dir(path))?;

    println!(
        "✅ Project created successfully! ({} files)",
        response.files_copied
    );
    println!();
    println!("Next steps:");
    for (i, step) in response.next_steps.iter().enumerate() {
        println!("   {}. {}", i + 1, step);
    }
    println!();
    println!("   API will be available at http://127.0.0.1:8000");
    println!("   Docs will be available at http://127.0.0.1:8000/docs");

    Ok(())
}

/// List the known templates.
pub fn list(ctx: &OpsContext) {
    println!("Available templates:");
    for info in ctx.templates() {
        let status = if info.available { "" } else { "  (missing)" };
        println!(
            "   {:<18} {}{}",
            info.template.id(),
            info.template.description(),
            status
        );
    }
    println!("\nTemplates: {}", ctx.config.template_source());
}
