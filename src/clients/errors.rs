use oxigraph::model::IriParseError;
use oxigraph::sparql::EvaluationError;
use oxigraph::store::{LoaderError, SerializerError, StorageError};
use rspotify::ClientError;
use rspotify::model::IdError;
use thiserror::Error;

/// Errors produced while extracting or querying a playlist graph
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Spotify error: {0}")]
    SpotifyError(#[from] ClientError),

    #[error("Invalid Spotify id: {0}")]
    InvalidId(#[from] IdError),

    #[error("Invalid IRI: {0}")]
    InvalidIri(#[from] IriParseError),

    #[error("Graph storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Failed to load graph: {0}")]
    LoaderError(#[from] LoaderError),

    #[error("Failed to serialize graph: {0}")]
    SerializerError(#[from] SerializerError),

    #[error("SPARQL evaluation error: {0}")]
    QueryError(#[from] EvaluationError),

    #[error("Unexpected query result: {0}")]
    UnexpectedResult(String),

    #[error("Malformed track record {0}: {1}")]
    MalformedRecord(String, String),

    #[error("Invalid input: {0}")]
    UserInput(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;
