use crate::batch::UpdateOutcome;
use crate::error::{Result, SiteupError};
use crate::host::{AdminApiClient, HostClient, PackageKind};
use crate::orchestrator::{BatchOrchestrator, BatchResult};
use crate::utils::BatchFile;
use colored::Colorize;

/// Execute the batch update workflow
pub fn execute_update(
    host_url: &str,
    token: Option<&str>,
    batch_path: &str,
    json_output: bool,
) -> Result<()> {
    if !json_output {
        println!("{}", "Starting batch update...".cyan().bold());
        println!("\n{}", "1. Loading update batch...".yellow());
    }

    let batch = BatchFile::load(batch_path)?;

    if !json_output {
        println!("   {} request(s) loaded", batch.len());
        println!("\n{}", "2. Connecting to host...".yellow());
    }

    let client = AdminApiClient::new(host_url, token)?;

    if !json_output {
        println!("\n{}", "3. Applying updates...".yellow());
    }

    let orchestrator = BatchOrchestrator::new(&client);
    let result = orchestrator.run(&batch);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match result {
        BatchResult::Rejected(rejection) => {
            println!("\n{} {}", "✗".red(), rejection.message.red());
            Err(SiteupError::BatchValidation(rejection.message))
        }
        BatchResult::Completed(outcomes) => {
            print_outcomes(&outcomes);
            Ok(())
        }
    }
}

fn print_outcomes(outcomes: &[UpdateOutcome]) {
    println!("\n{}", "Results:".cyan().bold());

    let mut applied = 0;
    for (index, outcome) in outcomes.iter().enumerate() {
        if outcome.status {
            applied += 1;
            println!("   {}. {} {}", index + 1, "✓".green(), outcome.message.green());
        } else {
            println!("   {}. {} {}", index + 1, "✗".red(), outcome.message);
        }
    }

    println!(
        "\n{}",
        format!("{} of {} update(s) applied", applied, outcomes.len()).bold()
    );
}

/// Execute the read-only check workflow
pub fn execute_check(host_url: &str, token: Option<&str>, kind: Option<&str>) -> Result<()> {
    let kinds = resolve_kinds(kind)?;

    println!("{}", "Checking for pending updates...".cyan().bold());

    let client = AdminApiClient::new(host_url, token)?;
    let mut total = 0;

    for kind in kinds {
        println!("\n{}", format!("Pending {} updates:", kind.as_str()).yellow());

        client.refresh_metadata(kind)?;
        let pending = client.pending_updates(kind)?;

        if pending.is_empty() {
            println!("   none");
            continue;
        }

        let mut slugs: Vec<_> = pending.keys().collect();
        slugs.sort();
        for slug in slugs {
            let update = &pending[slug];
            println!(
                "   • {} {}",
                slug.bright_cyan(),
                format!("-> {}", update.new_version).dimmed()
            );
            total += 1;
        }
    }

    println!("\n{}", format!("{} pending update(s)", total).bold());

    Ok(())
}

fn resolve_kinds(kind: Option<&str>) -> Result<Vec<PackageKind>> {
    match kind {
        None => Ok(vec![PackageKind::Plugin, PackageKind::Theme]),
        Some("plugin") => Ok(vec![PackageKind::Plugin]),
        Some("theme") => Ok(vec![PackageKind::Theme]),
        Some(other) => Err(SiteupError::InvalidArgument(format!(
            "Unknown kind '{}'. Expected 'plugin' or 'theme'",
            other
        ))),
    }
}
