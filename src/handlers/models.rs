use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::services::provisioner::LORA_FILES;
use crate::AppState;

#[derive(Serialize)]
pub struct ModelsResponse {
    pub qwen_image_edit: ModelInfo,
    pub loras: LoraInfo,
    pub cache_dirs: CacheDirs,
}

#[derive(Serialize)]
pub struct ModelInfo {
    pub loaded: bool,
    pub source: String,
    pub model_id: Option<String>,
    pub path: String,
}

#[derive(Serialize)]
pub struct LoraInfo {
    pub available: Vec<String>,
    pub path: String,
}

#[derive(Serialize)]
pub struct CacheDirs {
    pub huggingface: String,
    pub minio: String,
    pub loras: String,
}

/// Read-only snapshot of the provisioning outcome. Always succeeds.
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    let config = &state.config;

    let (source, model_id, default_path) = if config.use_huggingface {
        (
            "huggingface",
            Some(config.huggingface_model_id.clone()),
            config.huggingface_cache_dir(),
        )
    } else {
        ("minio", None, config.model_cache_dir.clone())
    };

    let path = state
        .model_state
        .path()
        .unwrap_or(&default_path)
        .display()
        .to_string();

    Json(ModelsResponse {
        qwen_image_edit: ModelInfo {
            loaded: state.model_state.is_loaded(),
            source: source.to_string(),
            model_id,
            path,
        },
        loras: LoraInfo {
            available: LORA_FILES.iter().map(|s| s.to_string()).collect(),
            path: config.lora_dir().display().to_string(),
        },
        cache_dirs: CacheDirs {
            huggingface: config.huggingface_cache_dir().display().to_string(),
            minio: config.model_cache_dir.display().to_string(),
            loras: config.lora_dir().display().to_string(),
        },
    })
}
