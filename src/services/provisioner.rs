use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::config::AppConfig;
use crate::services::hub::HubClient;
use crate::services::object_store::ObjectStoreClient;

/// Object-store key of the base model weights, relative to the bucket.
const BASE_MODEL_OBJECT: &str = "qwen-image-edit/model.safetensors";

/// LoRA adapters fetched from the fallback store.
pub const LORA_FILES: &[&str] = &[
    "Qwen-Edit-2509-Multiple-angles.safetensors",
    "Qwen-Image-Edit-Lightning-8steps-V1.0.safetensors",
];

/// Outcome of the one-shot startup resolution. Written exactly once,
/// before the server accepts traffic, then shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelState {
    /// No weights resolved; the service still serves health/models routes.
    Unloaded,
    /// Weights on disk and resident in memory.
    LoadedHandle { path: PathBuf },
    /// Weights on disk but the memory load failed. Degraded, not an error:
    /// inference backends that read from disk can still use the path.
    LoadedPathOnly { path: PathBuf },
}

impl ModelState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::LoadedHandle { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            ModelState::Unloaded => None,
            ModelState::LoadedHandle { path } | ModelState::LoadedPathOnly { path } => Some(path),
        }
    }
}

/// Resolves model weights at process start: hub snapshot first, object
/// store second, neither fatal. There are no retries and no transitions
/// after startup.
pub struct ModelProvisioner {
    config: Arc<AppConfig>,
    hub: HubClient,
    store: Option<ObjectStoreClient>,
}

impl ModelProvisioner {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let hub = HubClient::new(config.hf_token.clone());
        let store = ObjectStoreClient::from_config(&config);
        if store.is_some() {
            tracing::info!("Connected to MINIO at {}", config.minio_endpoint);
        }
        Self { config, hub, store }
    }

    pub async fn provision(&self) -> ModelState {
        if self.config.use_huggingface {
            tracing::info!("Attempting to load models from Hugging Face Hub...");
            match self.provision_from_hub().await {
                Ok(state) => {
                    tracing::info!("Models loaded from Hugging Face");
                    return state;
                }
                Err(e) => {
                    tracing::warn!("Hugging Face download failed, falling back to MINIO: {e}");
                }
            }
        }

        match &self.store {
            Some(store) => {
                tracing::info!("Loading models from MINIO S3...");
                self.provision_from_store(store).await;
                tracing::info!("Model artifacts staged from MINIO");
                ModelState::Unloaded
            }
            None => {
                tracing::warn!("Neither Hugging Face nor MINIO configured. Models not loaded.");
                ModelState::Unloaded
            }
        }
    }

    async fn provision_from_hub(&self) -> anyhow::Result<ModelState> {
        let cache_dir = self.config.huggingface_cache_dir();
        tokio::fs::create_dir_all(&cache_dir).await?;

        let repo_id = &self.config.huggingface_model_id;
        tracing::info!("Downloading Qwen model from Hugging Face: {}", repo_id);

        let snapshot = self.hub.snapshot(repo_id, &cache_dir).await?;
        tracing::info!("Model downloaded to: {}", snapshot.display());

        match load_weights(&snapshot) {
            Ok(()) => Ok(ModelState::LoadedHandle { path: snapshot }),
            Err(e) => {
                tracing::warn!(
                    "Could not load model into memory: {e}. Will use model path for inference."
                );
                Ok(ModelState::LoadedPathOnly { path: snapshot })
            }
        }
    }

    /// Fetch the fixed artifact list object by object. Each fetch is
    /// independently best-effort: one failure is logged and the rest
    /// still run. Existing files are never re-downloaded.
    async fn provision_from_store(&self, store: &ObjectStoreClient) {
        let bucket = &self.config.minio_bucket;
        let lora_dir = self.config.lora_dir();

        let mut artifacts: Vec<(String, PathBuf)> = vec![(
            BASE_MODEL_OBJECT.to_string(),
            self.config.model_cache_dir.join(BASE_MODEL_OBJECT),
        )];
        for lora in LORA_FILES {
            artifacts.push((format!("loras/{}", lora), lora_dir.join(lora)));
        }

        for (object, dest) in artifacts {
            if dest.exists() {
                tracing::debug!(object = %object, "artifact already on disk, skipping");
                continue;
            }
            tracing::info!("Downloading {} from MINIO...", object);
            match store.fetch_object(bucket, &object, &dest).await {
                Ok(()) => {
                    tracing::info!("Downloaded {} from MINIO to {}", object, dest.display());
                }
                Err(e) => {
                    tracing::error!("Error downloading {}: {e}", object);
                }
            }
        }
    }
}

/// In-memory load step: find the largest `.safetensors` file in the
/// snapshot and validate its header. Failure here leaves the weights
/// usable on disk (`LoadedPathOnly`).
fn load_weights(snapshot: &Path) -> anyhow::Result<()> {
    let mut best: Option<(u64, PathBuf)> = None;
    for entry in fs::read_dir(snapshot)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("safetensors") {
            continue;
        }
        let size = entry.metadata()?.len();
        if best.as_ref().map_or(true, |(s, _)| size > *s) {
            best = Some((size, path));
        }
    }

    let (_, weights) = best.ok_or_else(|| anyhow::anyhow!("no .safetensors file in snapshot"))?;
    validate_safetensors_header(&weights)
}

/// A safetensors file starts with a little-endian u64 header length
/// followed by a JSON header. Parsing that header is enough to confirm
/// the file is structurally sound without mapping the tensor data.
fn validate_safetensors_header(path: &Path) -> anyhow::Result<()> {
    let mut file = fs::File::open(path)?;
    let file_len = file.metadata()?.len();

    let mut len_buf = [0u8; 8];
    file.read_exact(&mut len_buf)?;
    let header_len = u64::from_le_bytes(len_buf);

    if header_len == 0 || header_len > file_len.saturating_sub(8) {
        anyhow::bail!(
            "implausible safetensors header length {} in {}",
            header_len,
            path.display()
        );
    }

    let mut header = vec![0u8; header_len as usize];
    file.read_exact(&mut header)?;
    serde_json::from_slice::<serde_json::Value>(&header)
        .map_err(|e| anyhow::anyhow!("corrupt safetensors header in {}: {e}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("qwen-edit-api-test-{}", name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_safetensors(path: &Path, header_json: &[u8], payload: &[u8]) {
        let mut f = fs::File::create(path).unwrap();
        f.write_all(&(header_json.len() as u64).to_le_bytes()).unwrap();
        f.write_all(header_json).unwrap();
        f.write_all(payload).unwrap();
    }

    #[test]
    fn state_helpers() {
        assert!(!ModelState::Unloaded.is_loaded());
        assert!(ModelState::Unloaded.path().is_none());

        let loaded = ModelState::LoadedHandle {
            path: PathBuf::from("/m"),
        };
        assert!(loaded.is_loaded());
        assert_eq!(loaded.path(), Some(Path::new("/m")));

        let degraded = ModelState::LoadedPathOnly {
            path: PathBuf::from("/m"),
        };
        assert!(!degraded.is_loaded());
        assert_eq!(degraded.path(), Some(Path::new("/m")));
    }

    #[test]
    fn valid_safetensors_header_loads() {
        let dir = temp_dir("valid-header");
        let path = dir.join("model.safetensors");
        write_safetensors(&path, br#"{"__metadata__":{}}"#, &[0u8; 16]);
        assert!(load_weights(&dir).is_ok());
    }

    #[test]
    fn corrupt_header_fails_load() {
        let dir = temp_dir("corrupt-header");
        let path = dir.join("model.safetensors");
        write_safetensors(&path, b"not json at all!", &[0u8; 16]);
        assert!(load_weights(&dir).is_err());
    }

    #[test]
    fn oversized_header_length_fails_load() {
        let dir = temp_dir("oversized-header");
        let path = dir.join("model.safetensors");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(&u64::MAX.to_le_bytes()).unwrap();
        f.write_all(&[0u8; 4]).unwrap();
        assert!(load_weights(&dir).is_err());
    }

    #[test]
    fn snapshot_without_weights_fails_load() {
        let dir = temp_dir("no-weights");
        fs::write(dir.join("config.json"), "{}").unwrap();
        assert!(load_weights(&dir).is_err());
    }

    #[test]
    fn largest_safetensors_file_is_chosen() {
        let dir = temp_dir("largest-wins");
        // Small valid file, large corrupt one: the large one must be picked.
        write_safetensors(&dir.join("adapter.safetensors"), br#"{}"#, &[0u8; 4]);
        write_safetensors(&dir.join("model.safetensors"), b"garbage-header-<>", &[0u8; 4096]);
        assert!(load_weights(&dir).is_err());
    }
}
