//! Configuration du système
//!
//! Priorité: fichier JSON (`--config`) > variables d'environnement > défauts.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use geoportail::config::parse_url;
use geoportail::ClientConfig;

/// Surcharges de configuration, toutes optionnelles
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// API Adresse
    pub geocoder_url: Option<String>,

    /// API Carto GPU (documents)
    pub gpu_document_url: Option<String>,

    /// Base de l'API détails du Géoportail de l'Urbanisme
    pub gpu_detail_url: Option<String>,

    /// Base des pages de consultation
    pub consultation_url: Option<String>,

    /// Timeout géocodage / GPU / détails (secondes)
    pub http_timeout_secs: Option<u64>,

    /// Timeout des téléchargements (secondes)
    pub download_timeout_secs: Option<u64>,

    pub user_agent: Option<String>,
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge la configuration depuis les variables d'environnement
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            geocoder_url: var("PLU_GEOCODER_URL"),
            gpu_document_url: var("PLU_GPU_DOCUMENT_URL"),
            gpu_detail_url: var("PLU_GPU_DETAIL_URL"),
            consultation_url: var("PLU_CONSULTATION_URL"),
            http_timeout_secs: var("PLU_HTTP_TIMEOUT_SECS").and_then(|s| s.trim().parse().ok()),
            download_timeout_secs: var("PLU_DOWNLOAD_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok()),
            user_agent: var("PLU_USER_AGENT"),
        }
    }

    /// Fusionne: les valeurs de `other` l'emportent
    pub fn merge(self, other: Config) -> Config {
        Config {
            geocoder_url: other.geocoder_url.or(self.geocoder_url),
            gpu_document_url: other.gpu_document_url.or(self.gpu_document_url),
            gpu_detail_url: other.gpu_detail_url.or(self.gpu_detail_url),
            consultation_url: other.consultation_url.or(self.consultation_url),
            http_timeout_secs: other.http_timeout_secs.or(self.http_timeout_secs),
            download_timeout_secs: other.download_timeout_secs.or(self.download_timeout_secs),
            user_agent: other.user_agent.or(self.user_agent),
        }
    }

    /// Construit la configuration du client HTTP
    pub fn to_client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::default();

        if let Some(url) = &self.geocoder_url {
            config.geocoder_url = parse_url(url)?;
        }
        if let Some(url) = &self.gpu_document_url {
            config.document_url = parse_url(url)?;
        }
        if let Some(url) = &self.gpu_detail_url {
            config.detail_url = parse_url(url)?;
        }
        if let Some(url) = &self.consultation_url {
            config.consultation_url = parse_url(url)?;
        }
        if let Some(secs) = self.http_timeout_secs {
            config.http_timeout = timeout_from_secs("http_timeout_secs", secs)?;
        }
        if let Some(secs) = self.download_timeout_secs {
            config.download_timeout = timeout_from_secs("download_timeout_secs", secs)?;
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }

        Ok(config)
    }

    /// Environnement puis fichier optionnel
    pub fn resolve(path: Option<&Path>) -> Result<ClientConfig> {
        let mut config = Self::from_env();
        if let Some(path) = path {
            config = config.merge(Self::load(path)?);
        }
        config.to_client_config()
    }
}

fn timeout_from_secs(key: &str, secs: u64) -> Result<Duration> {
    if secs == 0 {
        anyhow::bail!("{} must be greater than 0", key);
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_empty() {
        let client = Config::default().to_client_config().unwrap();
        assert_eq!(client.http_timeout, Duration::from_secs(15));
        assert_eq!(client.download_timeout, Duration::from_secs(60));
        assert_eq!(
            client.document_url.as_str(),
            "https://apicarto.ign.fr/api/gpu/document"
        );
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("PLU_GEOCODER_URL", "http://localhost:7878/search/"),
            ("PLU_HTTP_TIMEOUT_SECS", "5"),
            ("PLU_DOWNLOAD_TIMEOUT_SECS", "abc"),
            ("PLU_USER_AGENT", "  "),
        ]));
        assert_eq!(
            config.geocoder_url.as_deref(),
            Some("http://localhost:7878/search/")
        );
        assert_eq!(config.http_timeout_secs, Some(5));
        assert_eq!(config.download_timeout_secs, None);
        assert_eq!(config.user_agent, None);
    }

    #[test]
    fn test_merge_prefers_other() {
        let env = Config {
            http_timeout_secs: Some(5),
            user_agent: Some("env".to_string()),
            ..Default::default()
        };
        let file = Config {
            http_timeout_secs: Some(30),
            ..Default::default()
        };
        let merged = env.merge(file);
        assert_eq!(merged.http_timeout_secs, Some(30));
        assert_eq!(merged.user_agent.as_deref(), Some("env"));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plu.json");
        std::fs::write(
            &path,
            r#"{"gpu_detail_url": "http://localhost:9000/api/document", "download_timeout_secs": 120}"#,
        )
        .unwrap();

        let client = Config::load(&path).unwrap().to_client_config().unwrap();
        assert_eq!(
            client.detail_url_for("abc").unwrap().as_str(),
            "http://localhost:9000/api/document/abc/details"
        );
        assert_eq!(client.download_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: std::result::Result<Config, _> = serde_json::from_str(r#"{"timeout": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values() {
        let bad_url = Config {
            geocoder_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(bad_url.to_client_config().is_err());

        let zero = Config {
            http_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(zero.to_client_config().is_err());
    }
}
