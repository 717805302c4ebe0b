use crate::core::catalog::Catalog;
use crate::core::config::Config;
use crate::error::Result;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    pub name: String,
    pub path: PathBuf,
    pub url: String,
    pub present: bool,
    pub size: Option<u64>,
}

/// Local state of every catalog entry. Never touches the network.
pub fn collect_status(catalog: &Catalog) -> Vec<ModelStatus> {
    catalog
        .artifacts()
        .map(|artifact| {
            let task = artifact.task();
            let size = std::fs::metadata(&task.local_path).ok().map(|m| m.len());
            ModelStatus {
                present: task.local_path.exists(),
                name: artifact.name,
                path: task.local_path,
                url: task.remote_url,
                size,
            }
        })
        .collect()
}

pub fn list_models(config: &Config, json: bool) -> Result<()> {
    let catalog = config.catalog();
    if catalog.is_empty() && !json {
        println!("No models in the catalog.");
        return Ok(());
    }

    let statuses = collect_status(&catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!("Models under {}:", config.root.display());
    println!();

    for status in &statuses {
        let marker = if status.present { "✅" } else { "❌" };
        match status.size {
            Some(size) if status.present => {
                println!("  {marker} {} ({size} bytes)", status.path.display())
            }
            _ => println!("  {marker} {}", status.path.display()),
        }
    }

    let missing = statuses.iter().filter(|s| !s.present).count();
    println!();
    if missing == 0 {
        println!("All {} models are installed.", statuses.len());
    } else {
        println!("{missing} of {} models are missing.", statuses.len());
        println!("To install them, run:");
        println!("  rvc-models install");
    }

    Ok(())
}
