//! Status Command
//!
//! Project type, both profiles, and recorded enablement states.

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, GlobalOptions};
use crate::types::{ProfileKind, Result};

pub async fn run(options: &GlobalOptions, format: &str) -> Result<()> {
    let ctx = CommandContext::load(options).await?;
    let workspace = &ctx.workspace;
    let detection = workspace.explain().await?;
    let profiles = workspace.profiles();
    let enablement = workspace.enablement();

    if format == "json" {
        let status = serde_json::json!({
            "root": workspace.root(),
            "project_type": detection.project_type,
            "profiles": {
                "path": profiles.path(),
                "recovered": profiles.load_status().is_recovered(),
                "custom": profiles.profile(ProfileKind::Custom),
                "recommended": profiles.profile(ProfileKind::Recommended),
            },
            "enablement": {
                "path": enablement.path(),
                "recovered": enablement.load_status().is_recovered(),
                "states": enablement.states(),
            },
            "catalog": ctx.catalog.as_ref().map(|c| c.len()),
            "host": ctx.host.name(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let out = Output::new();
    out.header("extprofile status");
    out.field("Root", &workspace.root().display().to_string());
    out.field("Project type", detection.project_type.as_str());
    out.field(
        "Catalog",
        &ctx.catalog
            .as_ref()
            .map_or("not configured".to_string(), |c| format!("{} tools", c.len())),
    );
    out.field("Host", ctx.host.name());

    out.load_status("Profile", profiles.load_status());
    out.load_status("Enablement", enablement.load_status());

    out.section("Profiles");
    for kind in [ProfileKind::Custom, ProfileKind::Recommended] {
        let profile = profiles.profile(kind);
        let enabled = profile.extensions.iter().filter(|e| e.is_enabled).count();
        out.field(
            kind.as_str(),
            &format!("{} entries, {} enabled", profile.len(), enabled),
        );
    }

    out.section("Recorded states");
    if enablement.states().is_empty() {
        println!("  (none, every tool counts as enabled)");
    }
    for (identifier, enabled) in enablement.states() {
        let state = if *enabled { "enabled" } else { "disabled" };
        println!("  {:<40} {}", identifier, state);
    }

    Ok(())
}
