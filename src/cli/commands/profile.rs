//! Profile Command
//!
//! Usage:
//!   extprofile profile show [custom|recommended] [-f json]
//!   extprofile profile toggle <custom|recommended> <id>
//!   extprofile profile add <id>
//!   extprofile profile reset <custom|recommended>
//!   extprofile profile apply <custom|recommended> [-f json]

use crate::catalog::InstalledCatalog;
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, GlobalOptions};
use crate::enablement::ReconcileReport;
use crate::profile::ToggleOutcome;
use crate::types::{Profile, ProfileKind, Result};

/// Show one or both profiles, generating the recommended one if needed
pub async fn show(options: &GlobalOptions, kind: Option<ProfileKind>, format: &str) -> Result<()> {
    let mut ctx = CommandContext::load(options).await?;
    ensure_recommended(&mut ctx).await?;

    let kinds = match kind {
        Some(kind) => vec![kind],
        None => vec![ProfileKind::Custom, ProfileKind::Recommended],
    };
    let profiles = ctx.workspace.profiles();

    if format == "json" {
        let selected: Vec<&Profile> = kinds.iter().map(|k| profiles.profile(*k)).collect();
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    let out = Output::new();
    out.load_status("Profile", profiles.load_status());
    for kind in kinds {
        let profile = profiles.profile(kind);
        out.section(&format!("{} profile ({})", kind, profile.len()));
        if profile.is_empty() {
            println!("  (empty)");
        }
        for entry in &profile.extensions {
            out.entry(entry, profiles.enablement().is_enabled(&entry.identifier));
        }
    }

    if ctx.catalog.is_none() {
        out.info("No installed-tool catalog configured; recommended profile is not generated.");
    }
    Ok(())
}

pub async fn toggle(options: &GlobalOptions, kind: ProfileKind, identifier: &str) -> Result<()> {
    let mut ctx = CommandContext::load(options).await?;
    if kind == ProfileKind::Recommended {
        ensure_recommended(&mut ctx).await?;
    }

    let outcome = ctx
        .workspace
        .profiles_mut()
        .toggle_extension(kind, identifier, ctx.catalog.as_ref())
        .await?;

    report_outcome(kind, identifier, outcome, ctx.catalog.as_ref());
    Ok(())
}

pub async fn add(options: &GlobalOptions, identifier: &str) -> Result<()> {
    let mut ctx = CommandContext::load(options).await?;
    let empty = InstalledCatalog::default();

    let outcome = ctx
        .workspace
        .profiles_mut()
        .add_custom_extension(identifier, ctx.catalog.as_ref().unwrap_or(&empty))
        .await?;

    report_outcome(ProfileKind::Custom, identifier, outcome, ctx.catalog.as_ref());
    Ok(())
}

pub async fn reset(options: &GlobalOptions, kind: ProfileKind) -> Result<()> {
    let mut ctx = CommandContext::load(options).await?;
    ctx.workspace.profiles_mut().reset_profile(kind).await?;

    let out = Output::new();
    out.success(&format!("{} profile cleared", kind));
    if kind == ProfileKind::Recommended {
        out.info("It will be regenerated from the installed catalog on next use.");
    }
    Ok(())
}

pub async fn apply(options: &GlobalOptions, kind: ProfileKind, format: &str) -> Result<()> {
    let mut ctx = CommandContext::load(options).await?;
    if kind == ProfileKind::Recommended {
        ensure_recommended(&mut ctx).await?;
    }

    let report = ctx
        .workspace
        .profiles_mut()
        .apply_profile(kind, ctx.host.as_ref())
        .await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(kind, &report);
    }
    Ok(())
}

/// Materialize the recommended profile for the detected type
async fn ensure_recommended(ctx: &mut CommandContext) -> Result<()> {
    let project_type = ctx.workspace.detect().await?;
    ctx.workspace
        .profiles_mut()
        .recommended_profile(project_type, ctx.catalog.as_ref())
        .await?;
    Ok(())
}

fn report_outcome(
    kind: ProfileKind,
    identifier: &str,
    outcome: ToggleOutcome,
    catalog: Option<&InstalledCatalog>,
) {
    let out = Output::new();
    match outcome {
        ToggleOutcome::NotFound => {
            let hint = match (kind, catalog) {
                (ProfileKind::Custom, None) => " (no installed-tool catalog configured)",
                (ProfileKind::Custom, Some(_)) => " (not installed)",
                (ProfileKind::Recommended, _) => " (not in recommended profile)",
            };
            out.warning(&format!("{}: nothing to do{}", identifier, hint));
        }
        ToggleOutcome::Unchanged => {
            out.info(&format!("{} is already in the {} profile", identifier, kind));
        }
        changed => {
            out.success(&format!("{} {} ({} profile)", identifier, changed, kind));
        }
    }
}

fn print_report(kind: ProfileKind, report: &ReconcileReport) {
    let out = Output::new();
    out.header(&format!("Applied {} profile via {} host", kind, report.host));

    for applied in &report.applied {
        let state = if applied.enabled { "enabled" } else { "disabled" };
        println!("  {} {}", applied.identifier, state);
    }
    for failure in &report.failures {
        out.warning(&format!("{}: {}", failure.identifier, failure.message));
    }

    if report.is_clean() {
        out.success(&format!("{} tools reconciled", report.total()));
    } else {
        out.warning(&format!(
            "{} of {} host calls failed; states were saved",
            report.failures.len(),
            report.total()
        ));
    }
}
