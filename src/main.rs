use clap::{Arg, Command};
use std::path::Path;
use talentbook::configuration::{create_config, ConfigFolder};
use talentbook::startup::{run_add, run_export, run_list};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Command::new("talentbook")
        .about("🎤 Artist roster management backed by the Spotify catalog 🎤")
        .subcommand(
            Command::new("add")
                .about("🔍 Preview an artist from a Spotify URL and save it to the roster")
                .arg(Arg::new("url").value_name("URL").required(true)),
        )
        .subcommand(Command::new("list").about("📋 List all artists on the roster"))
        .subcommand(
            Command::new("export")
                .about("📤 Export the roster as CSV")
                .arg(Arg::new("file").value_name("FILE")),
        )
        .subcommand(
            Command::new("config").about("🛠️ Create or update configuration file for talentbook"),
        )
        .get_matches();

    let cfg_folder = ConfigFolder::new();

    match args.subcommand() {
        Some(("add", sub_args)) => {
            let url = sub_args
                .get_one::<String>("url")
                .expect("url argument is required");
            run_add(cfg_folder, url).await
        }
        Some(("list", _)) => run_list(cfg_folder).await,
        Some(("export", sub_args)) => {
            let default = "artists.csv".to_string();
            let file = sub_args.get_one::<String>("file").unwrap_or(&default);
            run_export(cfg_folder, Path::new(file)).await
        }
        Some(("config", _)) => {
            println!("\x1b[1m\x1b[34mConfiguring talentbook...\x1b[0m");
            create_config(cfg_folder).map_err(|e| anyhow::anyhow!(e.to_string()))
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("\x1b[1m\x1b[31mInvalid command!\x1b[0m\n");
    println!("📖 Available Commands:");
    println!("  \x1b[1m\x1b[32mtalentbook add <URL>\x1b[0m - 🔍 Preview and save an artist");
    println!("  \x1b[1m\x1b[32mtalentbook list\x1b[0m      - 📋 List the roster");
    println!("  \x1b[1m\x1b[32mtalentbook export\x1b[0m    - 📤 Export the roster as CSV");
    println!("  \x1b[1m\x1b[32mtalentbook config\x1b[0m    - 🛠️  Create or update configuration");
    println!("\x1b[33mUse these commands to keep your booking roster in one place!\x1b[0m\n");
}
