use crate::models::config::PreprocessConfig;
use image::{imageops, ImageFormat};
use ndarray::Array4;

/// Turns raw image bytes into the normalized tensor the classifier expects.
///
/// After the format and size gates, bytes are decoded to RGB, resized so the
/// shorter side equals the target while preserving aspect ratio, center
/// cropped to a square, scaled to [0, 1], and given a leading batch
/// dimension of 1 (NHWC).
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn preprocess(&self, bytes: &[u8]) -> Result<Array4<f32>, String> {
        if bytes.is_empty() {
            return Err("empty image data".to_string());
        }
        if bytes.len() > self.config.max_image_bytes {
            return Err(format!(
                "image is {} bytes, exceeds the {} byte limit",
                bytes.len(),
                self.config.max_image_bytes
            ));
        }

        let format = image::guess_format(bytes)
            .map_err(|e| format!("unrecognized image data: {}", e))?;
        match format {
            ImageFormat::Jpeg | ImageFormat::Png => {}
            other => return Err(format!("unsupported image format: {:?}", other)),
        }

        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| format!("image decode failed: {}", e))?;
        let rgb = decoded.to_rgb8();

        let target = self.config.target_size;
        let (width, height) = rgb.dimensions();

        // Shorter side becomes the target; the longer side keeps the ratio.
        let (new_width, new_height) = if height > width {
            (target, (target as f64 * height as f64 / width as f64) as u32)
        } else {
            ((target as f64 * width as f64 / height as f64) as u32, target)
        };
        let resized = imageops::resize(&rgb, new_width, new_height, imageops::FilterType::Lanczos3);

        let offset_x = (new_width.saturating_sub(target)) / 2;
        let offset_y = (new_height.saturating_sub(target)) / 2;
        let cropped = imageops::crop_imm(&resized, offset_x, offset_y, target, target).to_image();

        let side = target as usize;
        let mut tensor = Array4::<f32>::zeros((1, side, side, 3));
        for (x, y, pixel) in cropped.enumerate_pixels() {
            for channel in 0..3 {
                tensor[[0, y as usize, x as usize, channel]] = pixel[channel] as f32 / 255.0;
            }
        }
        Ok(tensor)
    }
}
