//! Récupération des pièces d'un document (Géoportail de l'Urbanisme)

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::GeoportailClient;
use crate::types::{DocumentDetails, Part};
use crate::GeoportailError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailsPayload {
    written_parts: Option<Vec<PartPayload>>,
    graphical_parts: Option<Vec<PartPayload>>,
    annexes: Option<Vec<PartPayload>>,
}

#[derive(Debug, Deserialize)]
struct PartPayload {
    name: Option<String>,
    url: Option<String>,
}

fn into_parts(parts: Option<Vec<PartPayload>>) -> Vec<Part> {
    parts
        .unwrap_or_default()
        .into_iter()
        .map(|p| Part {
            name: p.name.unwrap_or_default(),
            url: p.url.unwrap_or_default(),
        })
        .collect()
}

impl GeoportailClient {
    /// Récupère les détails complets d'un document
    ///
    /// # Errors
    ///
    /// - `ApiError` si l'API ne répond pas 200
    /// - `DecodeError` si le corps n'est pas du JSON
    /// - `IncompleteDetails` si le JSON n'est pas un objet avec `name`
    /// - `Http` en cas d'erreur de transport
    pub async fn fetch_details(&self, document_id: &str) -> Result<DocumentDetails, GeoportailError> {
        let url = self.config.detail_url_for(document_id)?;
        info!(document_id = document_id, "Fetching document details");

        let response = self
            .http
            .get(url.clone())
            .timeout(self.config.http_timeout)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(status = %status, url = %url, "Document details API error");
            return Err(GeoportailError::api_error(url.as_str(), status));
        }

        let body = response.bytes().await?;
        let details = parse_details(document_id, &body)?;

        debug!(
            written = details.written_parts.len(),
            graphical = details.graphical_parts.len(),
            annexes = details.annexes.len(),
            "Details parsed"
        );
        Ok(details)
    }
}

/// Parse la réponse `/details`
///
/// Un objet avec `name` mais sans pièces est un succès (document vide).
pub fn parse_details(document_id: &str, body: &[u8]) -> Result<DocumentDetails, GeoportailError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| GeoportailError::decode_error(format!("details {}", document_id), e))?;

    let name = match value.as_object().and_then(|object| object.get("name")) {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
        None => return Err(GeoportailError::IncompleteDetails(document_id.to_string())),
    };

    let payload: DetailsPayload = serde_json::from_value(value)
        .map_err(|e| GeoportailError::decode_error(format!("details {}", document_id), e))?;

    Ok(DocumentDetails {
        name,
        written_parts: into_parts(payload.written_parts),
        graphical_parts: into_parts(payload.graphical_parts),
        annexes: into_parts(payload.annexes),
    })
}
