//! Configuration du client HTTP

use std::time::Duration;

use url::Url;

use crate::GeoportailError;

pub const DEFAULT_GEOCODER_URL: &str = "https://api-adresse.data.gouv.fr/search/";
pub const DEFAULT_GPU_DOCUMENT_URL: &str = "https://apicarto.ign.fr/api/gpu/document";
pub const DEFAULT_GPU_DETAIL_URL: &str = "https://www.geoportail-urbanisme.gouv.fr/api/document";
pub const DEFAULT_CONSULTATION_URL: &str =
    "https://www.geoportail-urbanisme.gouv.fr/document/by-id";

/// Timeout des appels de recherche (géocodage, GPU, détails)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout des téléchargements de pièces
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration du client: endpoints et timeouts
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API Adresse (`?q=...&limit=1`)
    pub geocoder_url: Url,
    /// API Carto GPU (`?geom=...`)
    pub document_url: Url,
    /// Base des détails (`<base>/<id>/details`)
    pub detail_url: Url,
    /// Base de la page de consultation (`<base>/<id>`)
    pub consultation_url: Url,
    pub http_timeout: Duration,
    pub download_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            geocoder_url: Url::parse(DEFAULT_GEOCODER_URL).expect("valid default URL"),
            document_url: Url::parse(DEFAULT_GPU_DOCUMENT_URL).expect("valid default URL"),
            detail_url: Url::parse(DEFAULT_GPU_DETAIL_URL).expect("valid default URL"),
            consultation_url: Url::parse(DEFAULT_CONSULTATION_URL).expect("valid default URL"),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            user_agent: concat!("geoportail/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Configuration pointant toutes les API vers une même base (tests, proxy)
    pub fn with_base_url(base: &str) -> Result<Self, GeoportailError> {
        let base = base.trim_end_matches('/');
        Ok(Self {
            geocoder_url: parse_url(&format!("{}/search/", base))?,
            document_url: parse_url(&format!("{}/api/gpu/document", base))?,
            detail_url: parse_url(&format!("{}/api/document", base))?,
            consultation_url: parse_url(&format!("{}/document/by-id", base))?,
            ..Default::default()
        })
    }

    /// URL de consultation publique d'un document
    pub fn consultation_url_for(&self, document_id: &str) -> String {
        join_segments(&self.consultation_url, &[document_id])
            .map(|u| u.to_string())
            .unwrap_or_else(|| {
                format!(
                    "{}/{}",
                    self.consultation_url.as_str().trim_end_matches('/'),
                    document_id
                )
            })
    }

    /// URL des détails d'un document: `<base>/<id>/details`
    pub fn detail_url_for(&self, document_id: &str) -> Result<Url, GeoportailError> {
        join_segments(&self.detail_url, &[document_id, "details"]).ok_or_else(|| {
            GeoportailError::InvalidConfig(format!(
                "detail URL cannot be a base: {}",
                self.detail_url
            ))
        })
    }
}

/// Parse une URL d'endpoint
pub fn parse_url(raw: &str) -> Result<Url, GeoportailError> {
    Url::parse(raw).map_err(|e| GeoportailError::InvalidConfig(format!("{}: {}", raw, e)))
}

/// Ajoute des segments de chemin (encodés) à une URL de base
fn join_segments(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().ok()?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Some(url)
}
