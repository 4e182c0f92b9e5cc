//! Géocodage d'une adresse via l'API Adresse

use serde::Deserialize;
use tracing::{debug, info};

use crate::client::GeoportailClient;
use crate::types::{Coordinate, GeocodedAddress};
use crate::GeoportailError;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    features: Vec<SearchFeature>,
}

#[derive(Debug, Deserialize)]
struct SearchFeature {
    geometry: PointGeometry,
    #[serde(default)]
    properties: Option<SearchProperties>,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchProperties {
    label: Option<String>,
}

impl GeoportailClient {
    /// Convertit une adresse en coordonnées (premier résultat uniquement)
    ///
    /// # Errors
    ///
    /// - `NotFound` si l'adresse est vide, si l'API répond en erreur ou sans résultat
    /// - `Http` en cas d'erreur de transport (timeout, connexion)
    /// - `DecodeError` si la réponse n'est pas exploitable
    pub async fn geocode(&self, address: &str) -> Result<GeocodedAddress, GeoportailError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeoportailError::NotFound(String::new()));
        }

        info!(address = address, "Geocoding");

        let response = self
            .http
            .get(self.config.geocoder_url.clone())
            .query(&[("q", address), ("limit", "1")])
            .timeout(self.config.http_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = %status, "Geocoder returned an error status");
            return Err(GeoportailError::NotFound(address.to_string()));
        }

        let body = response.bytes().await?;
        parse_search_response(address, &body)
    }
}

/// Extrait la première adresse d'une réponse de l'API Adresse
pub fn parse_search_response(address: &str, body: &[u8]) -> Result<GeocodedAddress, GeoportailError> {
    let response: SearchResponse =
        serde_json::from_slice(body).map_err(|e| GeoportailError::decode_error("geocoder", e))?;

    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| GeoportailError::NotFound(address.to_string()))?;

    let (longitude, latitude) = match feature.geometry.coordinates.as_slice() {
        [lon, lat, ..] => (*lon, *lat),
        _ => {
            return Err(GeoportailError::decode_error(
                "geocoder",
                "point geometry without two coordinates",
            ))
        }
    };

    let label = feature
        .properties
        .unwrap_or_default()
        .label
        .unwrap_or_else(|| address.to_string());

    Ok(GeocodedAddress {
        label,
        coordinate: Coordinate::new(longitude, latitude),
    })
}
