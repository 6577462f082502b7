//! JSON-RPC 2.0 envelope types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Result, RpcError};

/// Protocol version carried by every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Correlation id of every request. Only one request is in flight per call,
/// so nothing ever needs to tell two ids apart.
pub const REQUEST_ID: u64 = 1;

/// JSON-RPC request
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P: Serialize> {
    pub jsonrpc: &'a str,
    pub method: &'a str,
    pub params: P,
    pub id: u64,
}

impl<'a, P: Serialize> RpcRequest<'a, P> {
    pub fn new(method: &'a str, params: P) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            id: REQUEST_ID,
        }
    }
}

/// A decoded response envelope: exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcResponse {
    Success(SuccessResponse),
    Error(ErrorResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub jsonrpc: Option<String>,
    pub id: Value,
    pub result: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub jsonrpc: Option<String>,
    pub id: Value,
    pub error: ErrorObject,
}

/// The node's `error` member, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcResponse {
    /// Build the envelope from a decoded body.
    ///
    /// `"result": null` is a success. `"error": null` counts as absent.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(RpcError::InvalidResponse(
                "response is not a JSON object".to_string(),
            ));
        };

        let jsonrpc = match map.remove("jsonrpc") {
            None => None,
            Some(Value::String(v)) => Some(v),
            Some(other) => {
                return Err(RpcError::InvalidResponse(format!(
                    "jsonrpc must be a string, got {}",
                    other
                )))
            }
        };

        let id = map
            .remove("id")
            .ok_or_else(|| RpcError::InvalidResponse("Missing id field".to_string()))?;

        let error = map.remove("error").filter(|e| !e.is_null());

        match (map.remove("result"), error) {
            (Some(result), None) => Ok(RpcResponse::Success(SuccessResponse {
                jsonrpc,
                id,
                result,
            })),
            (None, Some(error)) => {
                let error: ErrorObject = serde_json::from_value(error).map_err(|e| {
                    RpcError::InvalidResponse(format!("Malformed error object: {}", e))
                })?;
                Ok(RpcResponse::Error(ErrorResponse { jsonrpc, id, error }))
            }
            (Some(_), Some(_)) => Err(RpcError::InvalidResponse(
                "Both result and error fields present".to_string(),
            )),
            (None, None) => Err(RpcError::InvalidResponse(
                "Neither result nor error field present".to_string(),
            )),
        }
    }

    /// Build the envelope answering one of our requests: same checks as
    /// [`RpcResponse::from_value`], and the id must be [`REQUEST_ID`].
    pub fn from_reply(value: Value) -> Result<Self> {
        let response = Self::from_value(value)?;
        if response.id().as_u64() != Some(REQUEST_ID) {
            return Err(RpcError::InvalidResponse(format!(
                "response id {} does not match request id {}",
                response.id(),
                REQUEST_ID
            )));
        }
        Ok(response)
    }

    pub fn id(&self) -> &Value {
        match self {
            RpcResponse::Success(r) => &r.id,
            RpcResponse::Error(r) => &r.id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RpcResponse::Error(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            RpcResponse::Success(r) => Some(&r.result),
            RpcResponse::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorObject> {
        match self {
            RpcResponse::Success(_) => None,
            RpcResponse::Error(r) => Some(&r.error),
        }
    }

    /// Split into the result payload or the node's error object.
    pub fn into_result(self) -> std::result::Result<Value, ErrorObject> {
        match self {
            RpcResponse::Success(r) => Ok(r.result),
            RpcResponse::Error(r) => Err(r.error),
        }
    }
}

impl<'de> Deserialize<'de> for RpcResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RpcResponse::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl ErrorObject {
    /// The `data` payload when the node sent it as a string (hex revert data).
    pub fn data_hex(&self) -> Option<&str> {
        self.data.as_ref().and_then(Value::as_str)
    }

    pub fn kind(&self) -> NodeErrorKind {
        NodeErrorKind::classify(&self.message)
    }
}

/// Node error families seen when submitting or simulating transactions.
///
/// Codes differ between clients, so classification goes by message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeErrorKind {
    ExecutionReverted,
    NonceTooLow,
    NonceTooHigh,
    ReplacementUnderpriced,
    TransactionUnderpriced,
    IntrinsicGasTooLow,
    ExceedsBlockGasLimit,
    InsufficientFunds,
    InvalidChainId,
    Other,
}

impl NodeErrorKind {
    pub fn classify(message: &str) -> Self {
        let msg = message.to_ascii_lowercase();
        if msg.starts_with("execution reverted") {
            NodeErrorKind::ExecutionReverted
        } else if msg.contains("nonce too low") {
            NodeErrorKind::NonceTooLow
        } else if msg.contains("nonce too high") {
            NodeErrorKind::NonceTooHigh
        } else if msg.contains("replacement transaction underpriced") {
            NodeErrorKind::ReplacementUnderpriced
        } else if msg.contains("transaction underpriced") {
            NodeErrorKind::TransactionUnderpriced
        } else if msg.contains("intrinsic gas too low") {
            NodeErrorKind::IntrinsicGasTooLow
        } else if msg.contains("exceeds block gas limit") {
            NodeErrorKind::ExceedsBlockGasLimit
        } else if msg.contains("insufficient funds") {
            NodeErrorKind::InsufficientFunds
        } else if msg.contains("invalid chain id") {
            NodeErrorKind::InvalidChainId
        } else {
            NodeErrorKind::Other
        }
    }
}

/// Parse hex string to u64
pub fn parse_hex_u64(hex: &str) -> Option<u64> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    u64::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STRING_REVERT: &str = r#"{"jsonrpc":"2.0","id":1,"error":{"code":3,"message":"execution reverted: revert: Input must be greater than 10","data":"0x08c379a00000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000000000000000001d496e707574206d7573742062652067726561746572207468616e203130000000"}}"#;

    #[test]
    fn test_request_wire_shape() {
        let request = RpcRequest::new("eth_call", json!([{"to": "0xb4", "data": "0x01"}]));
        let encoded = serde_json::to_string(&request).unwrap();
        assert_eq!(
            encoded,
            r#"{"jsonrpc":"2.0","method":"eth_call","params":[{"data":"0x01","to":"0xb4"}],"id":1}"#
        );
    }

    #[test]
    fn test_error_envelope() {
        let response: RpcResponse = serde_json::from_str(STRING_REVERT).unwrap();
        assert!(response.is_error());
        assert_eq!(response.id(), &json!(1));

        let error = response.error().unwrap();
        assert_eq!(error.code, 3);
        assert_eq!(
            error.message,
            "execution reverted: revert: Input must be greater than 10"
        );
        assert!(error.data_hex().unwrap().starts_with("0x08c379a0"));
        assert_eq!(error.kind(), NodeErrorKind::ExecutionReverted);
    }

    #[test]
    fn test_success_envelope_with_null_result() {
        let response =
            RpcResponse::from_value(json!({"jsonrpc": "2.0", "id": 1, "result": null})).unwrap();
        assert_eq!(response.result(), Some(&Value::Null));
        assert!(response.error().is_none());
    }

    #[test]
    fn test_null_error_is_absent() {
        let response =
            RpcResponse::from_value(json!({"jsonrpc": "2.0", "id": 1, "result": "0x1", "error": null}))
                .unwrap();
        assert_eq!(response.into_result().unwrap(), json!("0x1"));
    }

    #[test]
    fn test_rejects_both_and_neither() {
        let both = RpcResponse::from_value(json!({
            "jsonrpc": "2.0", "id": 1, "result": "0x1",
            "error": {"code": -32000, "message": "boom"}
        }));
        assert!(matches!(both, Err(RpcError::InvalidResponse(_))));

        let neither = RpcResponse::from_value(json!({"jsonrpc": "2.0", "id": 1}));
        assert!(matches!(neither, Err(RpcError::InvalidResponse(_))));

        let no_id = RpcResponse::from_value(json!({"jsonrpc": "2.0", "result": "0x1"}));
        assert!(matches!(no_id, Err(RpcError::InvalidResponse(_))));
    }

    #[test]
    fn test_reply_id_must_match_request() {
        let ours = RpcResponse::from_reply(json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"}));
        assert!(ours.is_ok());

        for id in [json!(42), json!("1"), Value::Null] {
            let body = json!({"jsonrpc": "2.0", "id": id, "result": "0x1"});
            // Still a well-formed envelope on its own.
            assert!(RpcResponse::from_value(body.clone()).is_ok());
            assert!(matches!(
                RpcResponse::from_reply(body),
                Err(RpcError::InvalidResponse(_))
            ));
        }
    }

    #[test]
    fn test_error_without_data() {
        let response = RpcResponse::from_value(json!({
            "jsonrpc": "2.0", "id": 1,
            "error": {"code": -32003, "message": "nonce too low"}
        }))
        .unwrap();
        let error = response.into_result().unwrap_err();
        assert_eq!(error.code, -32003);
        assert!(error.data.is_none());
        assert_eq!(error.kind(), NodeErrorKind::NonceTooLow);
    }

    #[test]
    fn test_classify_messages() {
        use NodeErrorKind::*;
        assert_eq!(NodeErrorKind::classify("execution reverted"), ExecutionReverted);
        assert_eq!(NodeErrorKind::classify("nonce too high"), NonceTooHigh);
        assert_eq!(
            NodeErrorKind::classify("replacement transaction underpriced"),
            ReplacementUnderpriced
        );
        assert_eq!(NodeErrorKind::classify("transaction underpriced"), TransactionUnderpriced);
        assert_eq!(NodeErrorKind::classify("intrinsic gas too low"), IntrinsicGasTooLow);
        assert_eq!(NodeErrorKind::classify("exceeds block gas limit"), ExceedsBlockGasLimit);
        assert_eq!(
            NodeErrorKind::classify("insufficient funds for transfer"),
            InsufficientFunds
        );
        assert_eq!(NodeErrorKind::classify("invalid chain ID"), InvalidChainId);
        assert_eq!(NodeErrorKind::classify("method not found"), Other);
    }

    #[test]
    fn test_parse_hex_u64() {
        assert_eq!(parse_hex_u64("0x22b9"), Some(8889));
        assert_eq!(parse_hex_u64("4268"), Some(17000));
        assert_eq!(parse_hex_u64("0xzz"), None);
    }
}
