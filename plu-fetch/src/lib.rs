//! # plu-fetch
//!
//! Retrouve le document d'urbanisme applicable à une adresse et télécharge
//! ses pièces.
//!
//! ## Features
//!
//! - Géocodage, recherche GPU, sélection PLUi > PLU > CC > POS > PSMV
//! - Liste des pièces écrites, graphiques et annexes
//! - Téléchargement de la première pièce écrite ou de toutes les pièces
//! - Résumé JSON final
//!
//! ## Usage CLI
//!
//! ```bash
//! # Pipeline complet
//! plu-fetch "1 place de la République, Nantes"
//! plu-fetch "1 place de la République, Nantes" --all --output-dir ./pieces/
//!
//! # Étapes isolées
//! plu-fetch locate --lon -1.5565 --lat 47.2183
//! plu-fetch details 0a1b2c3d4e5f
//! plu-fetch download https://.../reglement.pdf --output reglement.pdf
//! ```

pub mod config;
pub mod pipeline;
pub mod present;
pub mod report;

pub use config::Config;
pub use pipeline::{resolve_address, DownloadMode, ResolveOptions};
pub use report::{PipelineOutcome, RunReport, RunSummary};
