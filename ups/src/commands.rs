use crate::cli::ListArgs;
use crate::config::Config;
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use ups_core::output::NONE;
use ups_core::{PackageEntry, Store, TableRenderer};

fn open_store(config: &Config) -> Result<Store> {
    let store = Store::open_with_legacy(&config.data_file, config.legacy_file.as_deref())
        .with_context(|| format!("Failed to open store {}", config.data_file.display()))?;
    tracing::debug!("{} package(s) registered in {}", store.len(), store.path().display());
    Ok(store)
}

fn progress_bar(len: usize, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        progress.set_style(style.progress_chars("#>-"));
    }
    progress
}

/// Run every check-script (unless `--cached`), save the fresh values and
/// render the comparison table.
pub async fn list(config: &Config, args: &ListArgs, quiet: bool) -> Result<()> {
    let mut store = open_store(config)?;
    let mut failures: Vec<(String, String)> = Vec::new();

    if !args.cached && !store.is_empty() {
        let progress = progress_bar(store.len(), quiet || args.json);
        let progress_clone = progress.clone();

        let checks = config
            .runner()
            .run_all(store.entries(), move |current, _total| {
                progress_clone.set_position(current as u64);
            })
            .await;
        progress.finish_and_clear();

        for check in checks {
            match check.result {
                Ok(latest) => store.record_latest(&check.name, latest)?,
                Err(e) => failures.push((check.name, e.to_string())),
            }
        }

        store.save().context("Failed to save the latest versions")?;
    }

    let renderer = TableRenderer::new(config.show_colors);
    let entries: Vec<&PackageEntry> = store.entries().collect();

    if args.json {
        println!("{}", renderer.render_json(&entries, args.outdated)?);
        for (name, error) in &failures {
            eprintln!("{name}: {error}");
        }
    } else {
        renderer.render(&entries, args.outdated);
        renderer.render_failures(&failures);
    }

    Ok(())
}

/// Register `name` with its check-script
pub fn insert(config: &Config, name: &str, script: &Path, force: bool) -> Result<()> {
    let mut store = open_store(config)?;
    let script_path = store.insert(name, script, force)?.script_path.clone();
    store.save().context("Failed to save the store")?;

    println!("Registered {} -> {}", name.yellow(), script_path.display());
    Ok(())
}

/// Record the current script output as the packaged version of each name.
///
/// Snapshots taken before a failure are still saved.
pub async fn snapshot(config: &Config, names: &[String], all: bool) -> Result<()> {
    let mut store = open_store(config)?;
    let runner = config.runner();

    let names = if all { store.names() } else { names.to_vec() };
    if names.is_empty() {
        println!("No packages registered.");
        return Ok(());
    }

    let mut outcome = Ok(());
    for name in &names {
        let entry = match store.get(name) {
            Ok(entry) => entry,
            Err(e) => {
                outcome = Err(e.into());
                break;
            }
        };

        let previous = entry.snapshot_version.clone();
        tracing::info!("fetching latest version of {name}");

        let latest = match runner.run(&entry.script_path).await {
            Ok(latest) => latest,
            Err(e) => {
                outcome = Err(anyhow::Error::new(e).context(format!("Failed to snapshot {name}")));
                break;
            }
        };

        println!(
            "{}: {} -> {}",
            name.yellow(),
            previous.as_deref().unwrap_or(NONE),
            latest.as_deref().unwrap_or(NONE).green()
        );
        store.record_snapshot(name, latest)?;
    }

    store.save().context("Failed to save the store")?;
    outcome
}

/// Print the latest version of `name`, caching it in the store
pub async fn get(config: &Config, name: &str) -> Result<()> {
    let mut store = open_store(config)?;
    let script_path = store.get(name)?.script_path.clone();

    let latest = config
        .runner()
        .run(&script_path)
        .await
        .with_context(|| format!("Failed to check {name}"))?;

    println!("{}", latest.as_deref().unwrap_or(NONE));

    store.record_latest(name, latest)?;
    store.save().context("Failed to save the store")?;
    Ok(())
}

/// Unregister `name`
pub fn remove(config: &Config, name: &str) -> Result<()> {
    let mut store = open_store(config)?;
    let entry = store.remove(name)?;
    store.save().context("Failed to save the store")?;

    println!("Removed {}", entry.name.yellow());
    Ok(())
}
