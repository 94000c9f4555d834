pub mod aggregator;
pub mod brand;
pub mod classifier;
pub mod ocr;
pub mod preprocess;
