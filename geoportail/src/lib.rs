//! # geoportail
//!
//! Client pour retrouver le document d'urbanisme (PLU, PLUi, CC, POS, PSMV)
//! applicable à une adresse et en télécharger les pièces.
//!
//! ## Étapes
//!
//! 1. Géocodage de l'adresse (API Adresse)
//! 2. Recherche des documents couvrant le point (API Carto GPU)
//! 3. Sélection du document principal (PLUi > PLU > CC > POS > PSMV)
//! 4. Récupération des pièces écrites, graphiques et annexes (Géoportail de l'Urbanisme)
//! 5. Téléchargement d'une pièce
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geoportail::{select_primary, ClientConfig, GeoportailClient};
//!
//! let client = GeoportailClient::new(ClientConfig::default())?;
//! let address = client.geocode("1 place de la République, Nantes").await?;
//! let documents = client.find_documents(address.coordinate).await?;
//! let document = select_primary(&documents)?;
//! let details = client.fetch_details(&document.id).await?;
//!
//! for part in &details.written_parts {
//!     println!("{}: {}", part.name, part.url);
//! }
//! ```

pub mod client;
pub mod config;
pub mod details;
pub mod document;
pub mod download;
pub mod error;
pub mod geocode;
pub mod select;
pub mod types;

pub use client::GeoportailClient;
pub use config::ClientConfig;
pub use download::{part_destination, part_file_name, unique_destination};
pub use error::GeoportailError;
pub use select::select_primary;
pub use types::{
    Coordinate, DocumentDetails, DocumentSummary, DocumentType, GeocodedAddress, Part, PartKind,
};
