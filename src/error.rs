/// Error types for the picker's collaborators
///
/// The grid cell itself never fails: a thumbnail that cannot be produced
/// just leaves the image surface blank. These errors belong to the
/// library catalog, the thumbnail cache and the config loader.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not determine the user {0} directory")]
    MissingDirectory(&'static str),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PickerError>;
