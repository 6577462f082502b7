//! Node endpoint configuration
//!
//! Values come from the process environment (optionally seeded from `.env`)
//! once at startup and are then passed around explicitly.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RpcError};

/// Overrides the network's default chain id.
pub const CHAIN_ID_VAR: &str = "CHAIN_ID";

/// Networks the harness is pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Holesky,
    LocalReth,
    Cfx8889,
}

impl Network {
    /// Environment variable holding the node URL.
    pub fn url_var(self) -> &'static str {
        match self {
            Network::Holesky => "HOLESKY_RPC",
            Network::LocalReth => "LOCAL_RETH_URL",
            Network::Cfx8889 => "CFX_8889_URL",
        }
    }

    /// Environment variable holding the funded signing key.
    pub fn key_var(self) -> &'static str {
        match self {
            Network::LocalReth => "LOCAL_RETH_PRIVATE_KEY",
            Network::Holesky | Network::Cfx8889 => "PRIVATE_KEY",
        }
    }

    pub fn default_chain_id(self) -> Option<u64> {
        match self {
            Network::Holesky => Some(17000),
            Network::LocalReth => None,
            Network::Cfx8889 => Some(8889),
        }
    }
}

impl FromStr for Network {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "holesky" => Ok(Network::Holesky),
            "localReth" | "local-reth" => Ok(Network::LocalReth),
            "cfx8889" => Ok(Network::Cfx8889),
            other => Err(RpcError::ParseError(format!("Unknown network: {}", other))),
        }
    }
}

/// Where to send requests and what to sign them with.
#[derive(Clone)]
pub struct NodeConfig {
    pub network: Network,
    pub rpc_url: String,
    /// Consumed by the signing collaborator, never by the client.
    pub private_key: Option<String>,
    pub chain_id: Option<u64>,
}

impl NodeConfig {
    pub fn from_env(network: Network) -> Result<Self> {
        Self::from_lookup(network, |key| std::env::var(key).ok())
    }

    /// Build from any key/value source.
    pub fn from_lookup<F>(network: Network, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = lookup(network.url_var())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| RpcError::InvalidUrl(format!("{} is not set", network.url_var())))?;

        let private_key = lookup(network.key_var()).filter(|v| !v.is_empty());

        let chain_id = match lookup(CHAIN_ID_VAR) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                RpcError::ParseError(format!("Invalid {} {:?}: {}", CHAIN_ID_VAR, raw, e))
            })?),
            None => network.default_chain_id(),
        };

        Ok(Self {
            network,
            rpc_url,
            private_key,
            chain_id,
        })
    }
}

impl fmt::Debug for NodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeConfig")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
