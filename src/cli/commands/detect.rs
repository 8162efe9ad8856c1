//! Detect Command
//!
//! Classify the project root and list what would be recommended for it.

use crate::catalog::recommended_identifiers;
use crate::cli::ui::Output;
use crate::cli::util::{GlobalOptions, load_config, resolve_root};
use crate::types::Result;
use crate::workspace::Workspace;

pub async fn run(options: &GlobalOptions, format: &str) -> Result<()> {
    let root = resolve_root(options)?;
    let config = load_config(&root, options)?;
    // Detection never needs the catalog or a host
    let workspace = Workspace::open(Some(root), config).await?;
    let detection = workspace.explain().await?;
    let recommended = recommended_identifiers(detection.project_type);

    if format == "json" {
        let output = serde_json::json!({
            "root": workspace.root(),
            "project_type": detection.project_type,
            "rule_index": detection.rule_index,
            "matched": detection.matched,
            "recommended": recommended,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let out = Output::new();
    out.header(&format!("Project type: {}", detection.project_type));
    out.field("Root", &workspace.root().display().to_string());
    match (&detection.matched, detection.rule_index) {
        (Some(marker), Some(index)) => out.field("Matched", &format!("rule {}: {}", index, marker)),
        _ => out.field("Matched", "no rule (fallback)"),
    }

    out.section("Recommended tools");
    for identifier in recommended {
        println!("  {}", identifier);
    }

    Ok(())
}
