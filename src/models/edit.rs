use serde::{Deserialize, Serialize};

fn default_steps() -> u32 {
    8
}

fn default_true() -> bool {
    true
}

fn default_camera_preset() -> String {
    "Front View".to_string()
}

fn default_lighting() -> String {
    "Cinematic".to_string()
}

/// Body of `POST /api/v1/edit`. Only `image` is required; the rest carry
/// the documented defaults.
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub image: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default = "default_true")]
    pub use_lightning: bool,
}

/// Body of `POST /api/v1/camera-edit`. The prompt is assembled server-side
/// from the resolved presets plus `additional_prompt`.
#[derive(Debug, Deserialize)]
pub struct CameraEditRequest {
    pub image: Option<String>,
    #[serde(default = "default_camera_preset")]
    pub camera_preset: String,
    #[serde(default = "default_lighting")]
    pub lighting: String,
    #[serde(default)]
    pub additional_prompt: String,
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default = "default_true")]
    pub use_lightning: bool,
}

#[derive(Debug, Serialize)]
pub struct EditResponse {
    pub image: String,
    pub prompt: String,
    pub steps: u32,
    pub lightning: bool,
}

/// Same as [`EditResponse`] but echoes the preset *names* as received,
/// not the resolved instruction fragments.
#[derive(Debug, Serialize)]
pub struct CameraEditResponse {
    pub image: String,
    pub camera_preset: String,
    pub lighting: String,
    pub prompt: String,
    pub steps: u32,
    pub lightning: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_request_defaults() {
        let req: EditRequest = serde_json::from_str(r#"{"image":"aGk="}"#).unwrap();
        assert_eq!(req.image.as_deref(), Some("aGk="));
        assert_eq!(req.prompt, "");
        assert_eq!(req.steps, 8);
        assert!(req.use_lightning);
    }

    #[test]
    fn camera_edit_request_defaults() {
        let req: CameraEditRequest = serde_json::from_str(r#"{"image":"aGk="}"#).unwrap();
        assert_eq!(req.camera_preset, "Front View");
        assert_eq!(req.lighting, "Cinematic");
        assert_eq!(req.additional_prompt, "");
        assert_eq!(req.steps, 8);
        assert!(req.use_lightning);
    }

    #[test]
    fn image_field_may_be_absent() {
        let req: EditRequest = serde_json::from_str(r#"{"prompt":"x"}"#).unwrap();
        assert!(req.image.is_none());
    }
}
