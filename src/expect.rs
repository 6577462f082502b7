//! Catalog of node error responses the harness asserts against
//!
//! Codes and messages are what the nodes under test (reth, Conflux eSpace)
//! answer. The revert payloads belong to the `Error` test contract; they
//! are example data tied to that contract, not properties of the client.

use thiserror::Error;

use crate::types::RpcResponse;

/// An expected JSON-RPC error object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expected {
    pub name: &'static str,
    pub code: i64,
    pub message: &'static str,
    /// Compared byte-for-byte when present.
    pub data: Option<&'static str>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    #[error("expected error {expected}, got result {result}")]
    NotAnError { expected: &'static str, result: String },

    #[error("error code: expected {expected}, got {actual}")]
    Code { expected: i64, actual: i64 },

    #[error("error message: expected {expected:?}, got {actual:?}")]
    Message { expected: String, actual: String },

    #[error("error data: expected {expected}, got {actual:?}")]
    Data {
        expected: String,
        actual: Option<String>,
    },
}

impl Expected {
    /// Compare a response against this expectation: code, then message, then data.
    pub fn check(&self, response: &RpcResponse) -> Result<(), Mismatch> {
        let error = match response {
            RpcResponse::Error(r) => &r.error,
            RpcResponse::Success(r) => {
                return Err(Mismatch::NotAnError {
                    expected: self.name,
                    result: r.result.to_string(),
                })
            }
        };

        if error.code != self.code {
            return Err(Mismatch::Code {
                expected: self.code,
                actual: error.code,
            });
        }
        if error.message != self.message {
            return Err(Mismatch::Message {
                expected: self.message.to_string(),
                actual: error.message.clone(),
            });
        }
        if let Some(expected) = self.data {
            if error.data_hex() != Some(expected) {
                return Err(Mismatch::Data {
                    expected: expected.to_string(),
                    actual: error.data.as_ref().map(|d| match d.as_str() {
                        Some(s) => s.to_string(),
                        None => d.to_string(),
                    }),
                });
            }
        }
        Ok(())
    }

    pub fn by_name(name: &str) -> Option<&'static Expected> {
        CATALOG.iter().find(|e| e.name == name)
    }
}

/// `require(x > 10, "...")` and `revert("...")` in `testRequire` / `testRevert`.
pub const STRING_REVERT: Expected = Expected {
    name: "string-revert",
    code: 3,
    message: "execution reverted: revert: Input must be greater than 10",
    data: Some("0x08c379a00000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000000000000000001d496e707574206d7573742062652067726561746572207468616e203130000000"),
};

/// `revert InsufficientBalance(0, 1)` in `testCustomError`.
pub const CUSTOM_ERROR_REVERT: Expected = Expected {
    name: "custom-error-revert",
    code: 3,
    message: "execution reverted",
    data: Some("0xcf47918100000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001"),
};

pub const NONCE_TOO_LOW: Expected = Expected {
    name: "nonce-too-low",
    code: -32003,
    message: "nonce too low",
    data: None,
};

/// Nonce far enough ahead of the account to fall outside the pool window.
pub const NONCE_TOO_HIGH: Expected = Expected {
    name: "nonce-too-high",
    code: -32003,
    message: "nonce too high",
    data: None,
};

/// The same signed transaction submitted twice.
pub const REPLACEMENT_UNDERPRICED: Expected = Expected {
    name: "replacement-underpriced",
    code: -32603,
    message: "replacement transaction underpriced",
    data: None,
};

/// Plain transfer with a gas limit of 20999.
pub const INTRINSIC_GAS_TOO_LOW: Expected = Expected {
    name: "intrinsic-gas-too-low",
    code: -32000,
    message: "intrinsic gas too low",
    data: None,
};

pub const EXCEEDS_BLOCK_GAS_LIMIT: Expected = Expected {
    name: "exceeds-block-gas-limit",
    code: -32603,
    message: "exceeds block gas limit",
    data: None,
};

pub const TRANSACTION_UNDERPRICED: Expected = Expected {
    name: "transaction-underpriced",
    code: -32603,
    message: "transaction underpriced",
    data: None,
};

/// Value plus gas cost above the account balance.
pub const INSUFFICIENT_FUNDS: Expected = Expected {
    name: "insufficient-funds",
    code: -32003,
    message: "insufficient funds for transfer",
    data: None,
};

/// Signed for a chain id the node does not serve.
pub const INVALID_CHAIN_ID: Expected = Expected {
    name: "invalid-chain-id",
    code: -32000,
    message: "invalid chain ID",
    data: None,
};

pub const CATALOG: &[Expected] = &[
    STRING_REVERT,
    CUSTOM_ERROR_REVERT,
    NONCE_TOO_LOW,
    NONCE_TOO_HIGH,
    REPLACEMENT_UNDERPRICED,
    INTRINSIC_GAS_TOO_LOW,
    EXCEEDS_BLOCK_GAS_LIMIT,
    TRANSACTION_UNDERPRICED,
    INSUFFICIENT_FUNDS,
    INVALID_CHAIN_ID,
];
