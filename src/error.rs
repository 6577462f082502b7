//! Error types for the JSON-RPC client

use thiserror::Error;

/// Client-side faults.
///
/// A JSON-RPC `error` object returned by the node is not one of these: it is
/// a completed exchange and comes back as response data.
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected response body (status {status}): {body}")]
    UnexpectedBody { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Hex decode error: {0}")]
    HexDecodeError(String),

    #[error("ABI decode error: {0}")]
    AbiDecodeError(#[from] alloy_sol_types::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<hex::FromHexError> for RpcError {
    fn from(e: hex::FromHexError) -> Self {
        RpcError::HexDecodeError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
