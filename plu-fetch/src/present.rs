//! Mise en forme console des résultats
//!
//! Fonctions pures: elles retournent du texte, l'écriture est faite par
//! l'appelant.

use geoportail::{DocumentDetails, DocumentSummary, PartKind};

const RULE_WIDTH: usize = 70;

/// Ligne de séparation
pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Titre encadré
pub fn banner(title: &str) -> String {
    format!("{}\n{}\n{}", rule(), title, rule())
}

/// Libellé du type d'un document
pub fn type_label(document: &DocumentSummary) -> &str {
    document
        .doc_type
        .as_ref()
        .map(|t| t.as_str())
        .unwrap_or("Type inconnu")
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

/// Liste numérotée des documents candidats
pub fn render_documents(documents: &[DocumentSummary]) -> String {
    let mut out = format!("\n📋 {} document(s) trouvé(s):\n", documents.len());
    for (i, doc) in documents.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {}\n     Type: {}\n     État: {}\n     Collectivité: {}\n",
            i + 1,
            doc.name,
            type_label(doc),
            or_dash(&doc.state),
            or_dash(&doc.collectivite)
        ));
        if let Some(date) = &doc.date_approbation {
            out.push_str(&format!("     Approbation: {}\n", date));
        }
    }
    out
}

/// Nombre de pièces par catégorie
pub fn render_detail_counts(details: &DocumentDetails) -> String {
    format!(
        "   📄 {} pièce(s) écrite(s)\n   🗺️  {} pièce(s) graphique(s)\n   📎 {} annexe(s)\n",
        details.written_parts.len(),
        details.graphical_parts.len(),
        details.annexes.len()
    )
}

/// Titre de section d'une catégorie de pièces
pub fn section_title(kind: PartKind) -> &'static str {
    match kind {
        PartKind::Written => "📄 Pièces écrites:",
        PartKind::Graphical => "🗺️  Pièces graphiques:",
        PartKind::Annex => "📎 Annexes:",
    }
}

/// Liste des pièces disponibles, une section par catégorie non vide
pub fn render_parts(details: &DocumentDetails) -> String {
    let mut out = format!("\n{}\n", banner("📋 PIÈCES DISPONIBLES"));

    for kind in PartKind::ALL {
        let parts = details.parts(kind);
        if parts.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}\n", section_title(kind)));
        for (i, part) in parts.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n     URL: {}\n", i + 1, part.name, part.url));
        }
    }
    out
}

/// Taille en Ko pour l'affichage
pub fn format_size_kb(bytes: u64) -> String {
    format!("{:.1} Ko", bytes as f64 / 1024.0)
}
