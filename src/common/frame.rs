use crate::error::AppError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::sync::Arc;
use uuid::Uuid;

/// A single raster image handed to the pose pipeline, either uploaded or captured live.
#[derive(Clone)]
pub struct Frame {
    source_id: Uuid,
    image: Arc<DynamicImage>,
    captured_at: DateTime<Utc>,
    frame_id: Uuid,
}

impl Frame {
    pub fn new(
        source_id: Uuid,
        image: DynamicImage,
        captured_at: DateTime<Utc>,
        frame_id: Uuid,
    ) -> Self {
        Self {
            source_id,
            image: Arc::new(image),
            captured_at,
            frame_id,
        }
    }

    /// Wraps an already decoded image as a fresh frame.
    pub fn from_image(image: DynamicImage) -> Self {
        Self::new(Uuid::new_v4(), image, Utc::now(), Uuid::new_v4())
    }

    /// Decodes a base64 image, with or without a `data:` URL header.
    pub fn decode_base64(payload: &str) -> Result<Self, AppError> {
        let bytes = decode_base64_payload(payload)?;
        Self::decode_bytes(&bytes)
    }

    pub fn decode_bytes(bytes: &[u8]) -> Result<Self, AppError> {
        if bytes.is_empty() {
            return Err(AppError::EmptyInput("image payload is empty".to_string()));
        }
        let image = image::load_from_memory(bytes)
            .map_err(|e| AppError::Decode(format!("invalid image data: {}", e)))?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(AppError::Decode(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }
        Ok(Self::from_image(image))
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn source_id(&self) -> Uuid {
        self.source_id
    }

    pub fn frame_id(&self) -> Uuid {
        self.frame_id
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>, AppError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| AppError::Decode(format!("failed to encode frame: {}", e)))?;
        Ok(buffer.into_inner())
    }
}

/// Strips an optional `data:<mime>;base64,` header and decodes the remainder.
pub fn decode_base64_payload(payload: &str) -> Result<Vec<u8>, AppError> {
    let trimmed = payload.trim();
    let body = match trimmed.split_once(',') {
        Some((_, body)) => body.trim(),
        None => trimmed,
    };
    if body.is_empty() {
        return Err(AppError::EmptyInput("payload is empty".to_string()));
    }
    STANDARD
        .decode(body)
        .map_err(|e| AppError::Decode(format!("invalid base64: {}", e)))
}
