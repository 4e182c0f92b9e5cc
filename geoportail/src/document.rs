//! Recherche des documents d'urbanisme couvrant un point (API Carto GPU)

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::client::GeoportailClient;
use crate::types::{Coordinate, DocumentSummary, DocumentType};
use crate::GeoportailError;

#[derive(Debug, Deserialize)]
struct DocumentResponse {
    #[serde(default)]
    features: Vec<DocumentFeature>,
}

#[derive(Debug, Deserialize)]
struct DocumentFeature {
    #[serde(default)]
    properties: Option<DocumentProperties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentProperties {
    id: Option<String>,
    name: Option<String>,
    document_type: Option<String>,
    state: Option<String>,
    collectivite_name: Option<String>,
    approbation_date: Option<String>,
}

impl From<DocumentProperties> for DocumentSummary {
    fn from(props: DocumentProperties) -> Self {
        Self {
            id: props.id.unwrap_or_default(),
            name: props.name.unwrap_or_default(),
            doc_type: props.document_type.as_deref().map(DocumentType::parse),
            state: props.state,
            collectivite: props.collectivite_name,
            date_approbation: props.approbation_date,
        }
    }
}

impl GeoportailClient {
    /// Trouve tous les documents d'urbanisme pour un point donné
    ///
    /// Retourne la liste dans l'ordre de l'API, sans déduplication.
    ///
    /// # Errors
    ///
    /// - `ApiError` si l'API ne répond pas 200
    /// - `NoDocument` si aucun document ne couvre le point (commune au RNU)
    /// - `DecodeError` si la réponse n'est pas du JSON exploitable
    /// - `Http` en cas d'erreur de transport
    pub async fn find_documents(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<DocumentSummary>, GeoportailError> {
        let geom = serde_json::to_string(&coordinate.to_geojson())
            .map_err(|e| GeoportailError::decode_error("geom", e))?;

        info!(
            longitude = coordinate.longitude,
            latitude = coordinate.latitude,
            "Searching urbanism documents"
        );
        debug!(geom = %geom, "GPU query geometry");

        let response = self
            .http
            .get(self.config.document_url.clone())
            .query(&[("geom", geom.as_str())])
            .timeout(self.config.http_timeout)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(status = %status, "GPU document API error");
            return Err(GeoportailError::api_error(
                self.config.document_url.as_str(),
                status,
            ));
        }

        let body = response.bytes().await?;
        let documents = parse_documents(&body)?;

        if documents.is_empty() {
            return Err(GeoportailError::NoDocument {
                longitude: coordinate.longitude,
                latitude: coordinate.latitude,
            });
        }

        debug!(count = documents.len(), "Documents found");
        Ok(documents)
    }
}

/// Convertit une réponse GPU en résumés de documents (ordre source)
pub fn parse_documents(body: &[u8]) -> Result<Vec<DocumentSummary>, GeoportailError> {
    let response: DocumentResponse =
        serde_json::from_slice(body).map_err(|e| GeoportailError::decode_error("gpu document", e))?;

    Ok(response
        .features
        .into_iter()
        .map(|f| DocumentSummary::from(f.properties.unwrap_or_default()))
        .collect())
}
