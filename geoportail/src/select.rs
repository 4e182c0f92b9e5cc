//! Sélection du document principal parmi les candidats

use crate::types::{DocumentSummary, DocumentType};
use crate::GeoportailError;

/// Sélectionne le document principal (PLUi > PLU > CC > POS > PSMV)
///
/// Pour le premier type de la liste de priorité présent parmi les candidats,
/// retourne le premier document de ce type dans l'ordre source. Si aucun
/// candidat n'a de type connu, retourne le premier de la liste.
pub fn select_primary(documents: &[DocumentSummary]) -> Result<&DocumentSummary, GeoportailError> {
    DocumentType::PRIORITY
        .iter()
        .find_map(|code| {
            documents
                .iter()
                .find(|doc| doc.doc_type.as_ref() == Some(code))
        })
        .or_else(|| documents.first())
        .ok_or(GeoportailError::NoSelection)
}
