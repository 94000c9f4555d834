/// OCR engine abstraction. The recognition backend runs on the original
/// uncropped image bytes; implementations are shared across concurrent
/// views, so they must be immutable after construction.
pub trait OcrEngine: Send + Sync {
    /// Recognize text from raw image bytes.
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, String>;
}
