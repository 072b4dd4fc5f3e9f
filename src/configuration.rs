use config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

#[derive(Deserialize)]
pub struct Settings {
    pub catalog: CatalogSettings,
}

/// Connection settings for the Spotify Web API.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    pub api_base_url: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl CatalogSettings {
    pub fn new(api_base_url: &str, token_url: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_string(),
            token_url: token_url.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        }
    }
}

pub fn get_configuration(cfg_file: &str) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::new(cfg_file, config::FileFormat::Yaml))
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub struct ConfigFolder {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub roster_db: PathBuf,
}

impl ConfigFolder {
    pub fn new() -> Self {
        let home_dir = env::var("HOME").expect("Failed to get HOME environment variable");

        Self {
            config_dir: get_config_dir_name(&home_dir),
            config_file: get_config_file_name(&home_dir),
            roster_db: get_roster_db_name(&home_dir),
        }
    }
}

impl Default for ConfigFolder {
    fn default() -> Self {
        Self::new()
    }
}

fn get_config_dir_name(home_dir: &str) -> PathBuf {
    Path::new(home_dir).join(".talentbook")
}

fn get_config_file_name(home_dir: &str) -> PathBuf {
    Path::new(home_dir).join(".talentbook").join("config.yaml")
}

fn get_roster_db_name(home_dir: &str) -> PathBuf {
    Path::new(home_dir).join(".talentbook").join("roster_db")
}

pub fn create_config(cfg_folder: ConfigFolder) -> Result<(), Box<dyn std::error::Error>> {
    println!("\x1b[1m\x1b[32mCreating configuration...\x1b[0m");
    let config_dir = cfg_folder.config_dir;

    if config_dir.exists() && !confirm_overwrite()? {
        println!("\x1b[33mOperation cancelled.\x1b[0m");
        return Ok(());
    }

    fs::create_dir_all(&config_dir)?;
    fs::create_dir_all(&cfg_folder.roster_db)?;

    let config_content = include_str!("config_template.yaml");
    fs::write(&cfg_folder.config_file, config_content)?;

    println!("\x1b[32mConfiguration folder created at:");
    println!("  -> ~/.talentbook");
    println!("Configuration file created at:");
    println!("  -> ~/.talentbook/config.yaml");
    println!("roster_db folder created at:");
    println!("  -> ~/.talentbook/roster_db");
    println!("\x1b[0mPlease edit the configuration file with your Spotify API credentials.");

    Ok(())
}

fn confirm_overwrite() -> Result<bool, io::Error> {
    println!("\x1b[31mThe configuration folder already exists.");
    println!("Do you want to overwrite it? Everything will be lost. (y/N)\x1b[0m");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() == "y" {
        Ok(true)
    } else {
        Ok(false)
    }
}
