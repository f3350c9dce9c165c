use mqtt_seedgen_protocol::MqttError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CorpusError>;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error(transparent)]
    Protocol(#[from] MqttError),

    #[error("Invalid mode selector: {0:#04x} (must be 0x00..=0x0f)")]
    InvalidSelector(u8),

    #[error(
        "Remaining length {target} is unreachable: the variable header alone is {overhead} bytes"
    )]
    UnreachableRemainingLength { target: usize, overhead: usize },

    #[error("Duplicate seed name: {0}")]
    DuplicateSeedName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest error: {0}")]
    Manifest(String),
}

impl From<toml::de::Error> for CorpusError {
    fn from(err: toml::de::Error) -> Self {
        CorpusError::Manifest(err.to_string())
    }
}

impl From<toml::ser::Error> for CorpusError {
    fn from(err: toml::ser::Error) -> Self {
        CorpusError::Manifest(err.to_string())
    }
}

impl From<serde_json::Error> for CorpusError {
    fn from(err: serde_json::Error) -> Self {
        CorpusError::Manifest(err.to_string())
    }
}
