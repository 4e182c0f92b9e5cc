//! Enchaînement géocodage → documents → sélection → détails → téléchargement
//!
//! Chaque étape écrit sa progression dans `out` et retourne soit sa valeur,
//! soit le `PipelineOutcome` qui arrête la suite du traitement.

use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use geoportail::{
    part_destination, select_primary, unique_destination, Coordinate, DocumentDetails,
    DocumentSummary, GeocodedAddress, GeoportailClient, GeoportailError, Part, PartKind,
};
use tracing::{info, warn};

use crate::present;
use crate::report::{DownloadRecord, PipelineOutcome, RunReport, RunSummary};

/// Étape: valeur produite ou issue arrêtant le pipeline
pub type Step<T> = std::result::Result<T, PipelineOutcome>;

/// Pièces à télécharger après l'affichage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadMode {
    /// Aucun téléchargement
    None,
    /// Première pièce écrite uniquement
    #[default]
    FirstWritten,
    /// Toutes les pièces de toutes les sections
    All,
}

/// Options de la commande par défaut
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub output_dir: PathBuf,
    pub prefix: String,
    pub download: DownloadMode,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            prefix: "exemple_".to_string(),
            download: DownloadMode::FirstWritten,
        }
    }
}

/// Pipeline complet pour une adresse
pub async fn resolve_address<W: Write>(
    client: &GeoportailClient,
    address: &str,
    options: &ResolveOptions,
    out: &mut W,
) -> Result<PipelineOutcome> {
    let geocoded = match geocode_step(client, address, out).await? {
        Ok(geocoded) => geocoded,
        Err(outcome) => return Ok(outcome),
    };

    let documents = match locate_step(client, geocoded.coordinate, out).await? {
        Ok(documents) => documents,
        Err(outcome) => return Ok(outcome),
    };

    let document = match select_step(&documents, out)? {
        Ok(document) => document.clone(),
        Err(outcome) => return Ok(outcome),
    };

    let details = match details_step(client, &document, out).await? {
        Ok(details) => details,
        Err(outcome) => return Ok(outcome),
    };

    write!(out, "{}", present::render_parts(&details))?;

    let targets = download_targets(&details, options.download);
    let mut downloads = Vec::with_capacity(targets.len());
    if !targets.is_empty() {
        let title = match options.download {
            DownloadMode::All => "📥 TÉLÉCHARGEMENT DES PIÈCES",
            _ => "📥 EXEMPLE DE TÉLÉCHARGEMENT",
        };
        writeln!(out, "\n{}", present::banner(title))?;

        tokio::fs::create_dir_all(&options.output_dir)
            .await
            .with_context(|| {
                format!("Failed to create output directory: {}", options.output_dir.display())
            })?;

        // Deux pièces de même nom ne doivent pas s'écraser
        let mut taken = HashSet::new();
        for part in targets {
            let destination = unique_destination(
                part_destination(&options.output_dir, &options.prefix, &part.name),
                &mut taken,
            );
            downloads.push(download_step(client, part, destination, out).await?);
        }
    }

    writeln!(out, "\n{}", present::banner("✅ TERMINÉ"))?;

    let summary = RunSummary::new(
        address,
        geocoded.coordinate,
        &document,
        &details,
        client.consultation_url(&document.id),
    );
    writeln!(out, "\n💾 Résumé JSON:")?;
    writeln!(out, "{}", summary.to_json()?)?;

    info!(
        document_id = %document.id,
        downloads = downloads.len(),
        "Pipeline completed"
    );

    Ok(PipelineOutcome::Completed(Box::new(RunReport {
        summary,
        document,
        details,
        downloads,
    })))
}

/// Géocodage; toute erreur devient `AddressNotFound`
pub async fn geocode_step<W: Write>(
    client: &GeoportailClient,
    address: &str,
    out: &mut W,
) -> Result<Step<GeocodedAddress>> {
    writeln!(out, "🔍 Géocodage de: {}", address)?;

    match client.geocode(address).await {
        Ok(geocoded) => {
            writeln!(out, "✅ Trouvée: {}", geocoded.label)?;
            Ok(Ok(geocoded))
        }
        Err(e) => {
            warn!(error = %e, "Geocoding failed");
            writeln!(out, "❌ Adresse non trouvée")?;
            Ok(Err(PipelineOutcome::AddressNotFound))
        }
    }
}

/// Recherche des documents au point
pub async fn locate_step<W: Write>(
    client: &GeoportailClient,
    coordinate: Coordinate,
    out: &mut W,
) -> Result<Step<Vec<DocumentSummary>>> {
    writeln!(
        out,
        "\n🔍 Recherche des documents pour ({:.6}, {:.6})",
        coordinate.latitude, coordinate.longitude
    )?;

    match client.find_documents(coordinate).await {
        Ok(documents) => {
            write!(out, "{}", present::render_documents(&documents))?;
            Ok(Ok(documents))
        }
        Err(GeoportailError::NoDocument { .. }) => {
            writeln!(out, "⚠️  Aucun document trouvé (commune probablement au RNU)")?;
            Ok(Err(PipelineOutcome::NoDocument))
        }
        Err(GeoportailError::ApiError { status, .. }) => {
            writeln!(out, "❌ Erreur API GPU: {}", status)?;
            Ok(Err(PipelineOutcome::LookupFailed))
        }
        Err(e) => {
            warn!(error = %e, "GPU lookup failed");
            writeln!(out, "❌ Erreur API GPU: {}", e)?;
            Ok(Err(PipelineOutcome::LookupFailed))
        }
    }
}

/// Sélection du document principal
pub fn select_step<'a, W: Write>(
    documents: &'a [DocumentSummary],
    out: &mut W,
) -> Result<Step<&'a DocumentSummary>> {
    match select_primary(documents) {
        Ok(document) => {
            writeln!(
                out,
                "\n🎯 Document sélectionné: {} ({})",
                document.name,
                present::type_label(document)
            )?;
            Ok(Ok(document))
        }
        Err(_) => {
            writeln!(out, "❌ Impossible de sélectionner un document")?;
            Ok(Err(PipelineOutcome::NoSelection))
        }
    }
}

/// Récupération des pièces du document retenu
pub async fn details_step<W: Write>(
    client: &GeoportailClient,
    document: &DocumentSummary,
    out: &mut W,
) -> Result<Step<DocumentDetails>> {
    writeln!(out, "\n📥 Récupération des détails du document...")?;

    let error = match client.fetch_details(&document.id).await {
        Ok(details) => {
            writeln!(out, "✅ Détails récupérés pour: {}", details.name)?;
            write!(out, "{}", present::render_detail_counts(&details))?;
            return Ok(Ok(details));
        }
        Err(e) => e,
    };

    match &error {
        GeoportailError::ApiError { status, .. } => writeln!(out, "❌ Erreur {}", status)?,
        GeoportailError::IncompleteDetails(_) => {
            writeln!(out, "⚠️  Document trouvé mais détails incomplets")?
        }
        GeoportailError::DecodeError { .. } => writeln!(out, "❌ Erreur de décodage JSON")?,
        other => writeln!(out, "❌ Erreur: {}", other)?,
    }
    warn!(document_id = %document.id, error = %error, "Details unavailable");

    let consultation_url = client.consultation_url(&document.id);
    writeln!(
        out,
        "\n⚠️  Le document existe mais les détails ne sont pas disponibles via l'API"
    )?;
    writeln!(out, "Essayez de consulter directement: {}", consultation_url)?;

    Ok(Err(PipelineOutcome::DetailsUnavailable {
        document_id: document.id.clone(),
        consultation_url,
    }))
}

/// Téléchargement d'une pièce; l'échec est rapporté, jamais propagé
pub async fn download_step<W: Write>(
    client: &GeoportailClient,
    part: &Part,
    destination: PathBuf,
    out: &mut W,
) -> Result<DownloadRecord> {
    let file_name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| destination.display().to_string());
    write!(out, "📥 Téléchargement de {}... ", file_name)?;
    out.flush()?;

    let record = match client.download_part(&part.url, &destination).await {
        Ok(bytes) => {
            writeln!(out, "✅ ({})", present::format_size_kb(bytes))?;
            DownloadRecord {
                name: part.name.clone(),
                path: destination,
                bytes: Some(bytes),
                error: None,
            }
        }
        Err(e) => {
            warn!(url = %part.url, error = %e, "Download failed");
            writeln!(out, "❌ Erreur: {}", e)?;
            DownloadRecord {
                name: part.name.clone(),
                path: destination,
                bytes: None,
                error: Some(e.to_string()),
            }
        }
    };
    Ok(record)
}

/// Pièces à télécharger selon le mode
pub fn download_targets(details: &DocumentDetails, mode: DownloadMode) -> Vec<&Part> {
    match mode {
        DownloadMode::None => Vec::new(),
        DownloadMode::FirstWritten => details.written_parts.iter().take(1).collect(),
        DownloadMode::All => PartKind::ALL
            .into_iter()
            .flat_map(|kind| details.parts(kind))
            .collect(),
    }
}
