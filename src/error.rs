use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("No CSV manifest found in the input archive")]
    ManifestNotFound,

    #[error("Label index {index} is out of range for style {style}")]
    LabelOutOfRange { index: usize, style: &'static str },

    #[error("Document conversion failed for {path}: {reason}")]
    Converter { path: PathBuf, reason: String },

    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("Archive entry escapes the extraction directory: {0}")]
    UnsafeEntry(String),

    #[error("Invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Cannot walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
