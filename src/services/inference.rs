use async_trait::async_trait;
use image::DynamicImage;

use crate::models::error::ApiError;

/// Seam for the actual editing model. The real Qwen Image Edit invocation
/// protocol is not implemented yet; handlers only depend on this trait so
/// a real engine can be dropped in without touching the HTTP layer.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    async fn infer(
        &self,
        image: DynamicImage,
        prompt: &str,
        steps: u32,
        use_lightning: bool,
    ) -> Result<DynamicImage, ApiError>;
}

/// Stand-in engine: returns the input image unchanged.
pub struct PassthroughEngine;

#[async_trait]
impl InferenceEngine for PassthroughEngine {
    async fn infer(
        &self,
        image: DynamicImage,
        prompt: &str,
        _steps: u32,
        _use_lightning: bool,
    ) -> Result<DynamicImage, ApiError> {
        tracing::debug!(prompt, "passthrough inference, returning input image");
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passthrough_returns_input_unchanged() {
        let img = DynamicImage::new_rgb8(4, 4);
        let out = PassthroughEngine
            .infer(img.clone(), "front view", 8, true)
            .await
            .unwrap();
        assert_eq!(out.as_bytes(), img.as_bytes());
    }
}
