/// # Command drivers
///
/// Wires configuration, the roster database, the catalog client and the
/// preview/commit workflow together, one function per CLI subcommand.
///
/// # Steps for `add`:
/// 1. Loads the configuration
/// 2. Opens the local roster database
/// 3. Validates the URL and resolves the preview
/// 4. Shows the preview and asks for confirmation
/// 5. Commits the record, reporting conflicts
///
use crate::catalog::{ArtistPreview, SpotifyResolver};
use crate::configuration::{self, ConfigFolder};
use crate::export::export_roster;
use crate::foundation::database::{open_database, ArtistRecord, Roster, SledRoster};
use crate::workflow::{PreviewWorkflow, WorkflowState};
use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn open_roster(config_folder: &ConfigFolder) -> Result<Arc<SledRoster>> {
    if !config_folder.config_dir.exists() || !config_folder.config_file.exists() {
        return Err(anyhow!(
            "Configuration folder or config.yaml not found. Please run 'talentbook config' first."
        ));
    }

    let db_path = config_folder
        .roster_db
        .to_str()
        .context("Failed to convert the database path to a string")?;

    let db = open_database(db_path).context("Failed to open the roster database")?;
    Ok(Arc::new(SledRoster::new(db)))
}

pub async fn run_add(config_folder: ConfigFolder, url: &str) -> Result<()> {
    let config_file = config_folder
        .config_file
        .to_str()
        .context("Failed to convert the config path to a string")?
        .to_string();
    let roster = open_roster(&config_folder)?;

    let config = configuration::get_configuration(&config_file)
        .map_err(|e| anyhow!("Unable to parse configuration file: {}", e))?;

    let resolver = Arc::new(SpotifyResolver::new(config.catalog, roster.clone()));
    let workflow = PreviewWorkflow::new(resolver, roster);

    let spinner = create_spinner("Fetching artist metadata...");
    let submitted = workflow.submit_url(url).await;
    spinner.finish_and_clear();

    if let Err(e) = submitted {
        eprintln!("\x1b[1m\x1b[31m{}\x1b[0m", e);
        return Ok(());
    }

    match workflow.state() {
        WorkflowState::Failed => {
            if let Some(error) = workflow.last_error() {
                eprintln!("\x1b[1m\x1b[31m{}\x1b[0m", error);
            }
        }
        WorkflowState::Previewed { exists: true } => {
            if let Some(preview) = workflow.preview() {
                print_preview(&preview);
            }
            println!("\x1b[33mThis artist is already on the roster. Nothing to do.\x1b[0m");
        }
        WorkflowState::Previewed { exists: false } => {
            if let Some(preview) = workflow.preview() {
                print_preview(&preview);
            }
            if confirm_save()? {
                commit(&workflow).await;
            } else {
                println!("\x1b[33mOperation cancelled.\x1b[0m");
            }
        }
        _ => {}
    }

    Ok(())
}

async fn commit(workflow: &PreviewWorkflow) {
    let spinner = create_spinner("Saving artist to the roster...");
    workflow.confirm_commit().await;
    spinner.finish_and_clear();

    match workflow.state() {
        WorkflowState::Committed => {
            println!("\x1b[32mArtist saved to the roster.\x1b[0m");
        }
        WorkflowState::Failed => {
            if let Some(error) = workflow.last_error() {
                eprintln!("\x1b[1m\x1b[31m{}\x1b[0m", error);
            }
        }
        _ => {}
    }
}

pub async fn run_list(config_folder: ConfigFolder) -> Result<()> {
    let roster = open_roster(&config_folder)?;
    let records = roster
        .list_all()
        .await
        .context("Failed to read the roster")?;

    println!("\x1b[1m\x1b[34mArtists ({})\x1b[0m", records.len());
    for record in &records {
        print_record(record);
    }

    Ok(())
}

pub async fn run_export(config_folder: ConfigFolder, output: &Path) -> Result<()> {
    let roster = open_roster(&config_folder)?;
    let records = roster
        .list_all()
        .await
        .context("Failed to read the roster")?;

    let bytes = export_roster(&records);
    std::fs::write(output, bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "\x1b[32mExported {} artists to {}\x1b[0m",
        records.len(),
        output.display()
    );

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_preview(preview: &ArtistPreview) {
    println!("\x1b[1m\x1b[34m{}\x1b[0m", preview.display_name);
    if !preview.genres.is_empty() {
        println!("  Genres: {}", preview.genres.join(", "));
    }
    if let Some(image_url) = &preview.image_url {
        println!("  Image:  {}", image_url);
    }
}

fn print_record(record: &ArtistRecord) {
    println!(
        "  \x1b[32m{}\x1b[0m ({}) - {} - added {}",
        record.display_name,
        record.identity,
        record.genres.join(", "),
        record.created_at.format("%Y-%m-%d")
    );
}

fn confirm_save() -> Result<bool, io::Error> {
    println!("\x1b[1mSave this artist to the roster? (y/N)\x1b[0m");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y")
}
