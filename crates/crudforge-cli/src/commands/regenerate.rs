//! Implementation of the `crudforge regenerate` command: re-run generation
//! for every stored scaffold, one at a time.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::instrument;

use crate::cli::{GlobalArgs, RegenerateArgs};
use crate::commands::{build_service, resolve_root};
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::output::OutputManager;

#[instrument(skip_all)]
pub fn execute(
    args: RegenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = resolve_root(&config, args.root.as_ref());
    let service = build_service(&config, &root);

    let spinner = if global.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("regenerating stored scaffolds...");
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let reports = service.regenerate_all()?;
    spinner.finish_and_clear();

    let mut failed = 0usize;
    for report in &reports {
        match &report.outcome {
            Ok(outcome) => {
                output.success(&format!(
                    "{} (#{}) — {} artifact(s)",
                    report.table_name,
                    report.id,
                    outcome.generated.len()
                ))?;
            }
            Err(reason) => {
                failed += 1;
                output.error(&format!("{} (#{}) — {reason}", report.table_name, report.id))?;
            }
        }
    }

    if reports.is_empty() {
        output.print("No scaffolds stored yet; nothing to regenerate.")?;
    } else {
        output.print(&format!(
            "{} scaffold(s) processed, {failed} failed",
            reports.len()
        ))?;
    }

    Ok(())
}
