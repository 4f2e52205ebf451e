use thiserror::Error;

/// Errors surfaced by the library. Generation itself fails only on
/// data availability; everything else is repaired or rejected in place.
#[derive(Debug, Error)]
pub enum Error {
    #[error("country '{0}' not found in demographic data")]
    UnknownCountry(String),

    #[error("country '{0}' has no forename data")]
    MissingForenames(String),

    #[error("country '{0}' has no surname data")]
    MissingSurnames(String),

    #[error("reading dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing dataset: {0}")]
    Dataset(#[from] serde_json::Error),
}
