use std::io::Cursor;
use std::sync::Arc;

use axum::body::Bytes;
use axum::{extract::State, Json};
use base64::Engine as _;
use image::{DynamicImage, ImageFormat};
use serde::de::DeserializeOwned;

use crate::models::edit::{CameraEditRequest, CameraEditResponse, EditRequest, EditResponse};
use crate::models::error::ApiError;
use crate::services::presets;
use crate::AppState;

/// Bodies are parsed from raw bytes rather than through the `Json`
/// extractor so malformed JSON maps to the documented 400 body instead
/// of the framework's rejection format.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)
}

fn decode_image(image_base64: &str) -> Result<DynamicImage, ApiError> {
    let data = base64::engine::general_purpose::STANDARD.decode(image_base64)?;
    let img = image::load_from_memory(&data)?;
    Ok(img)
}

fn encode_png_base64(img: &DynamicImage) -> Result<String, ApiError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(buf.into_inner()))
}

fn require_image(image: Option<String>) -> Result<String, ApiError> {
    match image {
        Some(data) if !data.is_empty() => Ok(data),
        _ => Err(ApiError::MissingImage),
    }
}

pub async fn edit_image(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<EditResponse>, ApiError> {
    let req: EditRequest = parse_body(&body)?;
    let image_base64 = require_image(req.image)?;

    let img = decode_image(&image_base64)?;
    let edited = state
        .engine
        .infer(img, &req.prompt, req.steps, req.use_lightning)
        .await?;

    Ok(Json(EditResponse {
        image: encode_png_base64(&edited)?,
        prompt: req.prompt,
        steps: req.steps,
        lightning: req.use_lightning,
    }))
}

pub async fn camera_edit(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CameraEditResponse>, ApiError> {
    let req: CameraEditRequest = parse_body(&body)?;
    let image_base64 = require_image(req.image)?;

    let camera_instruction = presets::resolve_camera(&req.camera_preset);
    let lighting_instruction = presets::resolve_lighting(&req.lighting);
    let full_prompt = presets::assemble_prompt(
        &camera_instruction,
        &lighting_instruction,
        &req.additional_prompt,
    );

    let img = decode_image(&image_base64)?;
    let edited = state
        .engine
        .infer(img, &full_prompt, req.steps, req.use_lightning)
        .await?;

    Ok(Json(CameraEditResponse {
        image: encode_png_base64(&edited)?,
        camera_preset: req.camera_preset,
        lighting: req.lighting,
        prompt: full_prompt,
        steps: req.steps,
        lightning: req.use_lightning,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_image_field_is_rejected() {
        assert!(matches!(
            require_image(Some(String::new())),
            Err(ApiError::MissingImage)
        ));
        assert!(matches!(require_image(None), Err(ApiError::MissingImage)));
        assert_eq!(require_image(Some("aGk=".into())).unwrap(), "aGk=");
    }

    #[test]
    fn invalid_base64_is_an_internal_error() {
        let err = decode_image("not base64 %%%").unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn non_image_bytes_are_an_internal_error() {
        let b64 = base64::engine::general_purpose::STANDARD.encode(b"plain text");
        let err = decode_image(&b64).unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let mut img = image::RgbImage::new(3, 2);
        img.put_pixel(1, 1, image::Rgb([200, 10, 30]));
        let img = DynamicImage::ImageRgb8(img);

        let b64 = encode_png_base64(&img).unwrap();
        let decoded = decode_image(&b64).unwrap();
        assert_eq!(decoded.to_rgb8().as_raw(), img.to_rgb8().as_raw());
    }
}
