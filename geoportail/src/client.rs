//! Client HTTP partagé par les différentes étapes

use reqwest::Client;

use crate::config::ClientConfig;
use crate::GeoportailError;

/// Client des API Adresse / GPU / Géoportail de l'Urbanisme
///
/// Les méthodes de chaque étape sont définies dans leur module
/// (`geocode`, `document`, `details`, `download`).
#[derive(Debug, Clone)]
pub struct GeoportailClient {
    pub(crate) http: Client,
    pub(crate) config: ClientConfig,
}

impl GeoportailClient {
    /// Crée un client avec la configuration donnée
    pub fn new(config: ClientConfig) -> Result<Self, GeoportailError> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    /// Configuration courante
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL de consultation publique d'un document
    pub fn consultation_url(&self, document_id: &str) -> String {
        self.config.consultation_url_for(document_id)
    }
}
