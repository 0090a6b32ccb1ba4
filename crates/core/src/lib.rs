//! Shared data model for document mark detection.

pub mod category;
pub mod detection;

pub use category::Category;
pub use detection::{CountByClass, Detection, DetectionStats};

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("unknown detection class: {0}")]
    UnknownClass(String),
}
