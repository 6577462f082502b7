//! Decoding of ABI-encoded revert payloads
//!
//! The client never looks inside `error.data`; callers that want to know
//! why a call reverted hand the hex string to [`RevertData::decode`].

use std::fmt;

use alloy_primitives::U256;
use alloy_sol_types::{sol, Panic, Revert, SolError};

use crate::error::{Result, RpcError};

sol! {
    /// Custom error raised by `testCustomError` on the `Error` test contract.
    error InsufficientBalance(uint256 balance, uint256 withdrawAmount);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertData {
    /// `0x`: reverted without a reason.
    Empty,
    /// `Error(string)` from `require` or `revert("...")`.
    ErrorString(String),
    /// `Panic(uint256)` from failed asserts and checked arithmetic.
    Panic(U256),
    InsufficientBalance {
        balance: U256,
        withdraw_amount: U256,
    },
    /// A selector this crate has no ABI for. The payload is kept whole.
    Unknown { selector: [u8; 4], data: Vec<u8> },
}

impl RevertData {
    pub fn decode(data: &str) -> Result<Self> {
        let data = data.strip_prefix("0x").unwrap_or(data);
        let bytes = hex::decode(data)?;

        if bytes.is_empty() {
            return Ok(RevertData::Empty);
        }
        if bytes.len() < 4 {
            return Err(RpcError::ParseError(format!(
                "revert payload of {} bytes is shorter than a selector",
                bytes.len()
            )));
        }

        let mut selector = [0u8; 4];
        selector.copy_from_slice(&bytes[..4]);

        let decoded = if selector == Revert::SELECTOR {
            RevertData::ErrorString(Revert::abi_decode(&bytes, true)?.reason)
        } else if selector == Panic::SELECTOR {
            RevertData::Panic(Panic::abi_decode(&bytes, true)?.code)
        } else if selector == InsufficientBalance::SELECTOR {
            let error = InsufficientBalance::abi_decode(&bytes, true)?;
            RevertData::InsufficientBalance {
                balance: error.balance,
                withdraw_amount: error.withdrawAmount,
            }
        } else {
            RevertData::Unknown {
                selector,
                data: bytes,
            }
        };

        Ok(decoded)
    }

    /// Selector as `0x`-prefixed hex, if the payload has one.
    pub fn selector_hex(&self) -> Option<String> {
        let selector = match self {
            RevertData::Empty => return None,
            RevertData::ErrorString(_) => Revert::SELECTOR,
            RevertData::Panic(_) => Panic::SELECTOR,
            RevertData::InsufficientBalance { .. } => InsufficientBalance::SELECTOR,
            RevertData::Unknown { selector, .. } => *selector,
        };
        Some(format!("0x{}", hex::encode(selector)))
    }
}

impl fmt::Display for RevertData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevertData::Empty => write!(f, "no revert reason"),
            RevertData::ErrorString(reason) => write!(f, "Error({:?})", reason),
            RevertData::Panic(code) => write!(f, "Panic({})", code),
            RevertData::InsufficientBalance {
                balance,
                withdraw_amount,
            } => write!(f, "InsufficientBalance({}, {})", balance, withdraw_amount),
            RevertData::Unknown { data, .. } => write!(f, "unknown error 0x{}", hex::encode(data)),
        }
    }
}
