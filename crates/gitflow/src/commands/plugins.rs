//! Plugin listing.

use anyhow::{Context, Result};

use crate::cli::ProjectArgs;

/// Prints the registered plugins and the one that handles the project.
pub fn run(project: &ProjectArgs) -> Result<()> {
    let engine = super::engine(project)?;

    println!("Registered plugins:\n");
    for (index, name) in engine.plugin_names().iter().enumerate() {
        println!("  {}. {name}", index + 1);
    }
    println!("\nFallback: {}", engine.fallback_name());

    let detected = engine
        .detect(&project.path)
        .with_context(|| format!("cannot inspect {}", project.path.display()))?;
    println!("Detected: {detected}");

    Ok(())
}
