//! Point d'entrée CLI pour plu-fetch

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use geoportail::GeoportailClient;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use plu_fetch::Config;

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::{Commands, ResolveArgs};

/// Retrouver le document d'urbanisme d'une adresse et télécharger ses pièces
#[derive(Parser)]
#[command(name = "plu-fetch")]
#[command(author, version)]
#[command(about = "Retrouver le PLU/PLUi applicable à une adresse et télécharger ses pièces")]
#[command(long_about = "Géocode une adresse, interroge le Géoportail de l'Urbanisme et liste les pièces écrites, graphiques et annexes du document applicable.\n\nPar défaut, exécute le pipeline complet et télécharge la première pièce écrite.")]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Fichier de configuration JSON (endpoints, timeouts)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sous-commande (défaut: pipeline complet depuis une adresse)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Arguments du pipeline complet (commande par défaut)
    #[command(flatten)]
    resolve: Option<ResolveArgs>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    let client_config =
        Config::resolve(cli.config.as_deref()).context("Invalid configuration")?;
    let client = GeoportailClient::new(client_config).context("Failed to build HTTP client")?;

    match cli.command {
        Some(Commands::Locate { lon, lat }) => {
            info!(lon = lon, lat = lat, "Locate");
            cli::cmd_locate(&client, lon, lat).await?;
        }
        Some(Commands::Details { id }) => {
            info!(id = %id, "Details");
            cli::cmd_details(&client, &id).await?;
        }
        Some(Commands::Download { url, output }) => {
            info!(url = %url, output = %output.display(), "Download");
            cli::cmd_download(&client, &url, &output).await?;
        }
        None => {
            // Commande par défaut: pipeline complet
            let Some(args) = cli.resolve else {
                Cli::command().print_help()?;
                return Ok(());
            };
            info!(address = %args.address, "Resolve address");
            cli::cmd_resolve(&client, &args).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
