//! Résultat d'une résolution d'adresse et résumé JSON

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use geoportail::{Coordinate, DocumentDetails, DocumentSummary, DocumentType};
use serde::Serialize;

/// Issue du pipeline. Toutes les variantes correspondent à une sortie propre.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Pipeline complet
    Completed(Box<RunReport>),
    /// Géocodage sans résultat
    AddressNotFound,
    /// Erreur de l'API GPU (statut, transport ou décodage)
    LookupFailed,
    /// Aucun document au point (RNU)
    NoDocument,
    /// Aucun document sélectionnable
    NoSelection,
    /// Document sélectionné mais pièces indisponibles via l'API
    DetailsUnavailable {
        document_id: String,
        consultation_url: String,
    },
}

impl PipelineOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Coordonnées dans le résumé (latitude d'abord, comme l'affichage)
#[derive(Debug, Clone, Serialize)]
pub struct Coordonnees {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinate> for Coordonnees {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

/// Document retenu dans le résumé
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRef {
    pub id: String,
    pub nom: String,
    #[serde(rename = "type")]
    pub doc_type: Option<DocumentType>,
    pub collectivite: Option<String>,
}

impl From<&DocumentSummary> for DocumentRef {
    fn from(doc: &DocumentSummary) -> Self {
        Self {
            id: doc.id.clone(),
            nom: doc.name.clone(),
            doc_type: doc.doc_type.clone(),
            collectivite: doc.collectivite.clone(),
        }
    }
}

/// Résumé JSON affiché en fin d'exécution
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub adresse: String,
    pub coordonnees: Coordonnees,
    pub document: DocumentRef,
    pub nb_pieces_ecrites: usize,
    pub nb_pieces_graphiques: usize,
    pub url_consultation: String,
}

impl RunSummary {
    pub fn new(
        address: &str,
        coordinate: Coordinate,
        document: &DocumentSummary,
        details: &DocumentDetails,
        consultation_url: String,
    ) -> Self {
        Self {
            adresse: address.to_string(),
            coordonnees: coordinate.into(),
            document: document.into(),
            nb_pieces_ecrites: details.written_parts.len(),
            nb_pieces_graphiques: details.graphical_parts.len(),
            url_consultation: consultation_url,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize summary")
    }

    /// Sauvegarde le résumé en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write summary: {}", path.display()))
    }
}

/// Résultat du téléchargement d'une pièce
#[derive(Debug, Clone)]
pub struct DownloadRecord {
    pub name: String,
    pub path: PathBuf,
    /// Taille écrite, absente en cas d'échec
    pub bytes: Option<u64>,
    pub error: Option<String>,
}

impl DownloadRecord {
    pub fn succeeded(&self) -> bool {
        self.bytes.is_some()
    }
}

/// Rapport complet d'une exécution réussie
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    pub document: DocumentSummary,
    pub details: DocumentDetails,
    pub downloads: Vec<DownloadRecord>,
}

impl RunReport {
    pub fn downloads_failed(&self) -> usize {
        self.downloads.iter().filter(|d| !d.succeeded()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoportail::Part;

    fn sample() -> (DocumentSummary, DocumentDetails) {
        let document = DocumentSummary {
            id: "plui1".to_string(),
            name: "244400404_PLUi_20190405".to_string(),
            doc_type: Some(DocumentType::PLUi),
            state: Some("production".to_string()),
            collectivite: Some("Nantes Métropole".to_string()),
            date_approbation: None,
        };
        let part = Part {
            name: "a.pdf".to_string(),
            url: "https://example.org/a.pdf".to_string(),
        };
        let details = DocumentDetails {
            name: document.name.clone(),
            written_parts: vec![part.clone(), part.clone()],
            graphical_parts: vec![part],
            annexes: vec![],
        };
        (document, details)
    }

    #[test]
    fn test_summary_shape() {
        let (document, details) = sample();
        let summary = RunSummary::new(
            "1 place de la République, Nantes",
            Coordinate::new(-1.556466, 47.218311),
            &document,
            &details,
            "https://www.geoportail-urbanisme.gouv.fr/document/by-id/plui1".to_string(),
        );

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["adresse"], "1 place de la République, Nantes");
        assert_eq!(json["coordonnees"]["latitude"], 47.218311);
        assert_eq!(json["coordonnees"]["longitude"], -1.556466);
        assert_eq!(json["document"]["id"], "plui1");
        assert_eq!(json["document"]["nom"], "244400404_PLUi_20190405");
        assert_eq!(json["document"]["type"], "PLUi");
        assert_eq!(json["document"]["collectivite"], "Nantes Métropole");
        assert_eq!(json["nb_pieces_ecrites"], 2);
        assert_eq!(json["nb_pieces_graphiques"], 1);
        assert_eq!(
            json["url_consultation"],
            "https://www.geoportail-urbanisme.gouv.fr/document/by-id/plui1"
        );
    }

    #[test]
    fn test_summary_keeps_non_ascii() {
        let (document, details) = sample();
        let summary = RunSummary::new("Nantes", Coordinate::new(0.0, 0.0), &document, &details, String::new());
        assert!(summary.to_json().unwrap().contains("Nantes Métropole"));
    }

    #[test]
    fn test_save_to_file() {
        let (document, details) = sample();
        let summary = RunSummary::new("Nantes", Coordinate::new(0.0, 0.0), &document, &details, String::new());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.json");
        summary.save_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"nb_pieces_ecrites\": 2"));
    }

    #[test]
    fn test_download_record_status() {
        let ok = DownloadRecord {
            name: "a".to_string(),
            path: PathBuf::from("a"),
            bytes: Some(10),
            error: None,
        };
        let ko = DownloadRecord {
            name: "b".to_string(),
            path: PathBuf::from("b"),
            bytes: None,
            error: Some("HTTP 404".to_string()),
        };
        assert!(ok.succeeded());
        assert!(!ko.succeeded());
    }
}
