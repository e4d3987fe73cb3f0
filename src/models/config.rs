use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub log_level: String,
    pub max_body_bytes: u64,

    /// Prefer the hub as the weight source; the object store remains the
    /// safety net when the hub path fails.
    pub use_huggingface: bool,
    pub huggingface_model_id: String,
    pub hf_token: Option<String>,

    pub minio_endpoint: String,
    pub minio_access_key: String,
    pub minio_secret_key: String,
    pub minio_bucket: String,
    pub minio_secure: bool,

    pub model_cache_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8081),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(104_857_600),
            use_huggingface: env::var("USE_HUGGINGFACE")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(true),
            huggingface_model_id: env::var("HUGGINGFACE_MODEL_ID")
                .unwrap_or_else(|_| "Qwen/Qwen2-VL-2B-Instruct".to_string()),
            // Both spellings are accepted; HF_TOKEN wins.
            hf_token: env::var("HF_TOKEN")
                .or_else(|_| env::var("HUGGINGFACE_TOKEN"))
                .ok()
                .filter(|t| !t.is_empty()),
            minio_endpoint: env::var("MINIO_ENDPOINT")
                .unwrap_or_else(|_| "localhost:9000".to_string()),
            minio_access_key: env::var("MINIO_ACCESS_KEY").unwrap_or_default(),
            minio_secret_key: env::var("MINIO_SECRET_KEY").unwrap_or_default(),
            minio_bucket: env::var("MINIO_BUCKET_NAME")
                .unwrap_or_else(|_| "qwen-models".to_string()),
            minio_secure: env::var("MINIO_SECURE")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            model_cache_dir: env::var("MODEL_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/app/models")),
        }
    }

    pub fn huggingface_cache_dir(&self) -> PathBuf {
        self.model_cache_dir.join("huggingface")
    }

    pub fn lora_dir(&self) -> PathBuf {
        self.model_cache_dir.join("loras")
    }
}
