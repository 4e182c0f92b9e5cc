//! Définition et implémentation des commandes CLI
//!
//! - défaut: adresse → document → pièces → téléchargement
//! - `locate`: documents couvrant un point
//! - `details`: pièces d'un document connu
//! - `download`: téléchargement d'une URL

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use geoportail::{Coordinate, GeoportailClient, Part};
use tracing::info;

use plu_fetch::pipeline::{self, DownloadMode, ResolveOptions};
use plu_fetch::{present, PipelineOutcome};

#[derive(Subcommand)]
pub enum Commands {
    /// List urbanism documents covering a WGS84 point and show the selected one
    Locate {
        /// Longitude (WGS84)
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Latitude (WGS84)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
    },

    /// List the parts of a document by its GPU id
    Details {
        /// Document id (as returned by `locate`)
        id: String,
    },

    /// Download a single part
    Download {
        /// Part URL
        url: String,

        /// Target file (overwritten if present)
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Arguments de la commande par défaut
#[derive(Args)]
pub struct ResolveArgs {
    /// Adresse à résoudre (ex: "1 place de la République, Nantes")
    pub address: String,

    /// Répertoire de destination des pièces téléchargées
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Préfixe des fichiers téléchargés
    #[arg(long, default_value = "exemple_")]
    pub prefix: String,

    /// Ne rien télécharger
    #[arg(long, conflicts_with = "all")]
    pub no_download: bool,

    /// Télécharger toutes les pièces (écrites, graphiques, annexes)
    #[arg(long)]
    pub all: bool,

    /// Écrire aussi le résumé JSON dans ce fichier
    #[arg(long)]
    pub summary_file: Option<PathBuf>,
}

impl ResolveArgs {
    fn options(&self) -> ResolveOptions {
        let download = if self.no_download {
            DownloadMode::None
        } else if self.all {
            DownloadMode::All
        } else {
            DownloadMode::FirstWritten
        };
        ResolveOptions {
            output_dir: self.output_dir.clone(),
            prefix: self.prefix.clone(),
            download,
        }
    }
}

/// Exécute le pipeline complet
pub async fn cmd_resolve(client: &GeoportailClient, args: &ResolveArgs) -> Result<()> {
    let mut out = std::io::stdout();
    writeln!(out, "{}", present::banner("🏛️  RÉCUPÉRATION DE DOCUMENTS PLU"))?;

    let outcome = pipeline::resolve_address(client, &args.address, &args.options(), &mut out).await?;
    info!(completed = outcome.is_completed(), "Resolve finished");

    if let (PipelineOutcome::Completed(report), Some(path)) = (&outcome, &args.summary_file) {
        report.summary.save_to_file(path)?;
        info!(path = %path.display(), "Summary saved");
    }

    Ok(())
}

/// Exécute la commande locate
pub async fn cmd_locate(client: &GeoportailClient, lon: f64, lat: f64) -> Result<()> {
    let coordinate = Coordinate::new(lon, lat);
    if !coordinate.is_valid_wgs84() {
        anyhow::bail!("Invalid WGS84 coordinate: lon={}, lat={}", lon, lat);
    }

    let mut out = std::io::stdout();
    let documents = match pipeline::locate_step(client, coordinate, &mut out).await? {
        Ok(documents) => documents,
        Err(_) => return Ok(()),
    };

    if let Ok(document) = pipeline::select_step(&documents, &mut out)? {
        writeln!(out, "   id: {}", document.id)?;
        writeln!(out, "   {}", client.consultation_url(&document.id))?;
    }
    Ok(())
}

/// Exécute la commande details
pub async fn cmd_details(client: &GeoportailClient, id: &str) -> Result<()> {
    let document = geoportail::DocumentSummary {
        id: id.to_string(),
        name: id.to_string(),
        doc_type: None,
        state: None,
        collectivite: None,
        date_approbation: None,
    };

    let mut out = std::io::stdout();
    if let Ok(details) = pipeline::details_step(client, &document, &mut out).await? {
        write!(out, "{}", present::render_parts(&details))?;
    }
    Ok(())
}

/// Exécute la commande download; un échec donne un code de sortie non nul
pub async fn cmd_download(client: &GeoportailClient, url: &str, output: &Path) -> Result<()> {
    let part = Part {
        name: output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        url: url.to_string(),
    };

    let mut out = std::io::stdout();
    let record = pipeline::download_step(client, &part, output.to_path_buf(), &mut out).await?;
    if !record.succeeded() {
        anyhow::bail!(
            "Download failed: {}",
            record.error.unwrap_or_else(|| url.to_string())
        );
    }
    Ok(())
}
