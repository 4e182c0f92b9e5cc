//! Téléchargement d'une pièce vers le disque

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::client::GeoportailClient;
use crate::GeoportailError;

impl GeoportailClient {
    /// Télécharge une pièce et l'écrit dans `destination` (écrasée si présente)
    ///
    /// Le corps est lu entièrement avant la création du fichier: une réponse
    /// en erreur ne laisse aucun fichier sur le disque.
    ///
    /// # Returns
    ///
    /// Le nombre d'octets écrits.
    ///
    /// # Errors
    ///
    /// `DownloadError` pour tout statut non-succès, erreur de transport ou
    /// erreur d'écriture.
    pub async fn download_part(&self, url: &str, destination: &Path) -> Result<u64, GeoportailError> {
        info!(url = url, destination = %destination.display(), "Downloading part");

        let response = self
            .http
            .get(url)
            .timeout(self.config.download_timeout)
            .send()
            .await
            .map_err(|e| GeoportailError::download_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoportailError::download_error(
                url,
                format!("HTTP {}", status),
            ));
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| GeoportailError::download_error(url, e))?;

        write_file(destination, &content)
            .await
            .map_err(|e| GeoportailError::download_error(url, e))?;

        debug!(bytes = content.len(), "Part written");
        Ok(content.len() as u64)
    }
}

/// Écrit le contenu complet; le fichier est fermé à la sortie du scope
async fn write_file(destination: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(destination).await?;
    file.write_all(content).await?;
    file.flush().await?;
    Ok(())
}

/// Nom de fichier sûr pour une pièce: `<prefix><nom>` sans séparateur de chemin
pub fn part_file_name(prefix: &str, part_name: &str) -> String {
    let cleaned: String = part_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        format!("{}piece", prefix)
    } else {
        format!("{}{}", prefix, cleaned)
    }
}

/// Chemin de destination d'une pièce dans `output_dir`
pub fn part_destination(output_dir: &Path, prefix: &str, part_name: &str) -> PathBuf {
    output_dir.join(part_file_name(prefix, part_name))
}

/// Chemin libre parmi `taken`: `plan.pdf`, puis `plan_2.pdf`, `plan_3.pdf`...
///
/// Le chemin retourné est ajouté à `taken`.
pub fn unique_destination(destination: PathBuf, taken: &mut HashSet<PathBuf>) -> PathBuf {
    if taken.insert(destination.clone()) {
        return destination;
    }

    let stem = destination
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = destination
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut index = 2;
    loop {
        let candidate = destination.with_file_name(format!("{}_{}{}", stem, index, extension));
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> GeoportailClient {
        GeoportailClient::new(ClientConfig::with_base_url(&server.uri()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_download_writes_exact_bytes() {
        let server = MockServer::start().await;
        let body: Vec<u8> = (0u8..=255).cycle().take(10_000).collect();
        Mock::given(method("GET"))
            .and(path("/files/reglement.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("exemple_reglement.pdf");
        let client = client_for(&server).await;

        let size = client
            .download_part(&format!("{}/files/reglement.pdf", server.uri()), &destination)
            .await
            .unwrap();

        assert_eq!(size, 10_000);
        assert_eq!(std::fs::read(&destination).unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_overwrites_existing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/small"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("piece");
        std::fs::write(&destination, b"previous longer content").unwrap();

        let client = client_for(&server).await;
        client
            .download_part(&format!("{}/small", server.uri()), &destination)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&destination).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_download_404_creates_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("exemple_missing.pdf");
        let client = client_for(&server).await;

        let result = client
            .download_part(&format!("{}/missing.pdf", server.uri()), &destination)
            .await;

        match result {
            Err(GeoportailError::DownloadError { reason, .. }) => assert!(reason.contains("404")),
            other => panic!("Expected DownloadError, got {:?}", other),
        }
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn test_download_write_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("no_such_dir").join("file.pdf");
        let client = client_for(&server).await;

        let result = client
            .download_part(&format!("{}/any", server.uri()), &destination)
            .await;
        assert!(matches!(result, Err(GeoportailError::DownloadError { .. })));
    }

    #[tokio::test]
    async fn test_download_transport_error() {
        let client = GeoportailClient::new(ClientConfig::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("file.pdf");

        // Port 9 (discard) fermé en local
        let result = client
            .download_part("http://127.0.0.1:9/file.pdf", &destination)
            .await;
        assert!(matches!(result, Err(GeoportailError::DownloadError { .. })));
        assert!(!destination.exists());
    }

    #[test]
    fn test_part_file_name() {
        assert_eq!(
            part_file_name("exemple_", "4_Reglement.pdf"),
            "exemple_4_Reglement.pdf"
        );
        assert_eq!(part_file_name("exemple_", "../etc/passwd"), "exemple__etc_passwd");
        assert_eq!(part_file_name("", ".."), "piece");
        assert_eq!(part_file_name("p_", "a:b*c"), "p_a_b_c");
    }

    #[test]
    fn test_part_destination_stays_in_dir() {
        let dir = Path::new("/tmp/plu");
        let dest = part_destination(dir, "", "sub/dir/file.pdf");
        assert_eq!(dest, Path::new("/tmp/plu/sub_dir_file.pdf"));
    }

    #[test]
    fn test_unique_destination_suffixes_clashes() {
        let dir = Path::new("/tmp/plu");
        let mut taken = HashSet::new();

        let first = unique_destination(dir.join("exemple_plan.pdf"), &mut taken);
        let second = unique_destination(dir.join("exemple_plan.pdf"), &mut taken);
        let third = unique_destination(dir.join("exemple_plan.pdf"), &mut taken);
        let other = unique_destination(dir.join("exemple_zonage.pdf"), &mut taken);

        assert_eq!(first, dir.join("exemple_plan.pdf"));
        assert_eq!(second, dir.join("exemple_plan_2.pdf"));
        assert_eq!(third, dir.join("exemple_plan_3.pdf"));
        assert_eq!(other, dir.join("exemple_zonage.pdf"));

        // Sans extension
        let plain = unique_destination(dir.join("exemple_piece"), &mut taken);
        let plain_2 = unique_destination(dir.join("exemple_piece"), &mut taken);
        assert_eq!(plain, dir.join("exemple_piece"));
        assert_eq!(plain_2, dir.join("exemple_piece_2"));
    }
}
