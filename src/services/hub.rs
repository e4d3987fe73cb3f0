use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;

use crate::services::download::staging_path;

const HUB_BASE_URL: &str = "https://huggingface.co";

/// Client for a hub-style model repository. Downloads a full repo
/// snapshot by listing the repo manifest and streaming each file to the
/// local cache, skipping files that are already present.
pub struct HubClient {
    client: reqwest::Client,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoManifest {
    siblings: Vec<RepoFile>,
}

#[derive(Debug, Deserialize)]
struct RepoFile {
    rfilename: String,
}

impl HubClient {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Download every file of `repo_id` into `cache_dir`, returning the
    /// snapshot directory. Files already on disk are kept, so an
    /// interrupted snapshot resumes where it left off.
    pub async fn snapshot(&self, repo_id: &str, cache_dir: &Path) -> anyhow::Result<PathBuf> {
        let manifest = self.fetch_manifest(repo_id).await?;

        let snapshot_dir = cache_dir.join(repo_id.replace('/', "--"));
        tokio::fs::create_dir_all(&snapshot_dir).await?;

        for file in &manifest.siblings {
            let dest = snapshot_dir.join(&file.rfilename);
            if dest.exists() {
                tracing::debug!(file = %file.rfilename, "already cached, skipping");
                continue;
            }

            let url = format!(
                "{}/{}/resolve/main/{}",
                HUB_BASE_URL, repo_id, file.rfilename
            );
            tracing::info!(file = %file.rfilename, "downloading from hub");
            self.download_file(&url, &dest).await?;
        }

        Ok(snapshot_dir)
    }

    async fn fetch_manifest(&self, repo_id: &str) -> anyhow::Result<RepoManifest> {
        let url = format!("{}/api/models/{}", HUB_BASE_URL, repo_id);
        let manifest = self
            .authorized(self.client.get(&url))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("Hub manifest request failed: {e}"))?
            .json::<RepoManifest>()
            .await?;
        Ok(manifest)
    }

    /// Stream a single file to disk, staged through a `.part` path and
    /// renamed once complete.
    async fn download_file(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("Download failed: {e}"))?;

        let total_size = response.content_length();
        if let Some(size) = total_size {
            tracing::info!("  Size: {:.1} MB", size as f64 / (1024.0 * 1024.0));
        }

        let part_path = staging_path(dest);
        let mut file = tokio::fs::File::create(&part_path).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(total) = total_size {
                if downloaded % (50 * 1024 * 1024) < chunk.len() as u64 {
                    tracing::info!(
                        "  Progress: {:.0}%",
                        downloaded as f64 / total as f64 * 100.0
                    );
                }
            }
        }

        file.flush().await?;
        tokio::fs::rename(&part_path, dest).await?;

        Ok(())
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_parses_sibling_list() {
        let json = r#"{"siblings":[{"rfilename":"config.json"},{"rfilename":"model.safetensors"}]}"#;
        let manifest: RepoManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.siblings.len(), 2);
        assert_eq!(manifest.siblings[1].rfilename, "model.safetensors");
    }

    #[test]
    fn snapshot_dir_flattens_repo_id() {
        let dir = Path::new("/cache").join("Qwen/Qwen2-VL-2B-Instruct".replace('/', "--"));
        assert_eq!(dir, PathBuf::from("/cache/Qwen--Qwen2-VL-2B-Instruct"));
    }
}
