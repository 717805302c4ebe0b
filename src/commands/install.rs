use crate::core::config::Config;
use crate::core::fetch::{Fetcher, HttpTransport};
use crate::core::install::{ArtifactStatus, InstallReport, Installer};
use crate::core::progress::BarProgress;
use crate::error::Result;

/// Downloads every missing catalog entry and prints a summary.
///
/// Individual download failures are part of the returned report, not errors.
pub fn install_models(config: &Config, json: bool) -> Result<InstallReport> {
    let catalog = config.catalog();

    if !json {
        println!(
            "Checking {} model files under {}",
            catalog.len(),
            config.root.display()
        );
    }

    let fetcher = Fetcher::new(HttpTransport::new()?)
        .with_chunk_size(config.chunk_size)
        .atomic(config.atomic);
    let mut installer = Installer::new(fetcher, BarProgress::default());
    let report = installer.install(&catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(report)
}

fn print_summary(report: &InstallReport) {
    println!();
    println!(
        "Installed: {}  Already present: {}  Failed: {}",
        report.installed(),
        report.skipped(),
        report.failed()
    );

    if report.has_failures() {
        println!();
        println!("The following models could not be installed:");
        for outcome in report.failures() {
            if let ArtifactStatus::Failed { message, .. } = &outcome.status {
                println!("  • {}: {message}", outcome.name);
            }
        }
        println!();
        println!("Run the command again to retry the missing files.");
    }
}
