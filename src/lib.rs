//! Node error envelope client
//!
//! A minimal JSON-RPC 2.0 client for checking the exact error envelopes an
//! Ethereum-compatible node returns for reverting or invalid transactions.

pub mod config;
pub mod error;
pub mod expect;
pub mod revert;
pub mod rpc_client;
pub mod types;

pub use config::{Network, NodeConfig};
pub use error::{Result, RpcError};
pub use expect::{Expected, Mismatch};
pub use revert::RevertData;
pub use rpc_client::RpcClient;
pub use types::{ErrorObject, NodeErrorKind, RpcRequest, RpcResponse};
