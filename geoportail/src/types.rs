//! Types de données pour le crate geoportail

use std::fmt;

use serde::{Serialize, Serializer};

/// Coordonnée WGS84 (degrés)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Vérifie que la coordonnée est dans les bornes WGS84
    pub fn is_valid_wgs84(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }

    pub fn to_point(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }

    /// Géométrie GeoJSON Point attendue par l'API Carto GPU
    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&self.to_point()))
    }
}

/// Adresse géocodée: libellé normalisé + coordonnée
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    pub label: String,
    pub coordinate: Coordinate,
}

/// Type de document d'urbanisme (`documentType` côté GPU)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// PLU intercommunal
    PLUi,
    /// Plan Local d'Urbanisme
    PLU,
    /// Carte Communale
    CC,
    /// Plan d'Occupation des Sols
    POS,
    /// Plan de Sauvegarde et de Mise en Valeur
    PSMV,
    /// Code non reconnu, conservé tel quel
    Other(String),
}

impl DocumentType {
    /// Ordre de priorité pour la sélection du document principal
    pub const PRIORITY: [DocumentType; 5] = [
        DocumentType::PLUi,
        DocumentType::PLU,
        DocumentType::CC,
        DocumentType::POS,
        DocumentType::PSMV,
    ];

    /// Parse le code exact renvoyé par l'API (sensible à la casse)
    pub fn parse(code: &str) -> Self {
        match code {
            "PLUi" => Self::PLUi,
            "PLU" => Self::PLU,
            "CC" => Self::CC,
            "POS" => Self::POS,
            "PSMV" => Self::PSMV,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::PLUi => "PLUi",
            Self::PLU => "PLU",
            Self::CC => "CC",
            Self::POS => "POS",
            Self::PSMV => "PSMV",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DocumentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Résumé d'un document trouvé par l'API Carto GPU
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    /// Identifiant GPU du document
    pub id: String,

    /// Nom du document
    pub name: String,

    /// Type (PLUi, PLU, ...), absent si non renseigné
    pub doc_type: Option<DocumentType>,

    /// État (production, ...)
    pub state: Option<String>,

    /// Nom de la collectivité
    pub collectivite: Option<String>,

    /// Date d'approbation
    pub date_approbation: Option<String>,
}

/// Catégorie de pièce d'un document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Written,
    Graphical,
    Annex,
}

impl PartKind {
    pub const ALL: [PartKind; 3] = [PartKind::Written, PartKind::Graphical, PartKind::Annex];
}

/// Pièce téléchargeable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub url: String,
}

/// Détails complets d'un document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentDetails {
    pub name: String,
    pub written_parts: Vec<Part>,
    pub graphical_parts: Vec<Part>,
    pub annexes: Vec<Part>,
}

impl DocumentDetails {
    /// Pièces d'une catégorie donnée
    pub fn parts(&self, kind: PartKind) -> &[Part] {
        match kind {
            PartKind::Written => &self.written_parts,
            PartKind::Graphical => &self.graphical_parts,
            PartKind::Annex => &self.annexes,
        }
    }

    pub fn total_parts(&self) -> usize {
        self.written_parts.len() + self.graphical_parts.len() + self.annexes.len()
    }
}
