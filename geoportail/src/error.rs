//! Types d'erreurs pour le crate geoportail

use thiserror::Error;

/// Erreurs pouvant survenir lors de la résolution d'un document d'urbanisme
#[derive(Debug, Error)]
pub enum GeoportailError {
    /// Le géocodage n'a retourné aucune adresse
    #[error("Address not found: {0}")]
    NotFound(String),

    /// Réponse HTTP non-succès d'une API (GPU, détails)
    #[error("API error from {endpoint}: HTTP {status}")]
    ApiError { endpoint: String, status: u16 },

    /// Aucun document à cet emplacement (commune probablement au RNU)
    #[error("No urbanism document at ({longitude}, {latitude})")]
    NoDocument { longitude: f64, latitude: f64 },

    /// Aucune candidate à la sélection
    #[error("No document to select from")]
    NoSelection,

    /// Le document existe mais l'API n'a pas renvoyé son contenu structuré
    #[error("Incomplete details for document {0}")]
    IncompleteDetails(String),

    /// Corps de réponse JSON invalide
    #[error("JSON decode error in {context}: {reason}")]
    DecodeError { context: String, reason: String },

    /// Échec du téléchargement d'une pièce
    #[error("Download failed for {url}: {reason}")]
    DownloadError { url: String, reason: String },

    /// Erreur de transport HTTP (connexion, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur d'I/O hors téléchargement
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration invalide (URL d'endpoint, etc.)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GeoportailError {
    /// Crée une erreur d'API avec contexte
    pub fn api_error(endpoint: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::ApiError {
            endpoint: endpoint.into(),
            status: status.as_u16(),
        }
    }

    /// Crée une erreur de décodage JSON
    pub fn decode_error(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::DecodeError {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    /// Crée une erreur de téléchargement
    pub fn download_error(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::DownloadError {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
