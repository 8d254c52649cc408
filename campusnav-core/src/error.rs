use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Unknown node: {0}")]
    UnknownNode(String),
    #[error("Destination does not resolve to any node")]
    DestinationNotFound,
    #[error("No start node found near the user")]
    NoStartNode,
    #[error("No path between {from} and {to}")]
    NoPath { from: String, to: String },
}
