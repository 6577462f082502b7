//! Ethereum JSON-RPC client

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};
use url::Url;

use crate::error::{Result, RpcError};
use crate::types::{RpcRequest, RpcResponse};

/// Sends single JSON-RPC 2.0 requests to one node endpoint.
///
/// Holds nothing but the endpoint and the HTTP client, so concurrent calls
/// on the same instance never interact.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: Client,
    url: Url,
}

impl RpcClient {
    /// Create a new RPC client. Fails on an empty, malformed, or non-HTTP endpoint.
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(RpcError::InvalidUrl("endpoint is empty".to_string()));
        }

        let url = Url::parse(endpoint)
            .map_err(|e| RpcError::InvalidUrl(format!("{}: {}", endpoint, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RpcError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                endpoint,
                url.scheme()
            )));
        }

        let client = Client::builder().build()?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send `method` with `params` and return the decoded body as-is.
    ///
    /// A body carrying a JSON-RPC `error` is a successful exchange and is
    /// returned like any other. Only transport faults are errors here.
    pub async fn send<P: Serialize>(&self, method: &str, params: P) -> Result<Value> {
        if method.is_empty() {
            return Err(RpcError::InvalidRequest("method name is empty".to_string()));
        }

        let request = RpcRequest::new(method, params);
        let body = serde_json::to_vec(&request)
            .map_err(|e| RpcError::InvalidRequest(format!("params for {}: {}", method, e)))?;

        debug!(method, url = %self.url, "sending JSON-RPC request");

        let result = self.post(body).await;
        if let Err(e) = &result {
            error!("Error sending RPC request {}: {}", method, e);
        }
        result
    }

    /// Same exchange as [`RpcClient::send`], with the body checked against
    /// the envelope schema and the request id.
    pub async fn send_typed<P: Serialize>(&self, method: &str, params: P) -> Result<RpcResponse> {
        let body = self.send(method, params).await?;
        RpcResponse::from_reply(body).map_err(|e| {
            error!("Malformed response to {}: {}", method, e);
            e
        })
    }

    /// `eth_call` with an already-populated transaction object.
    pub async fn eth_call<T: Serialize>(&self, tx: T) -> Result<RpcResponse> {
        self.send_typed("eth_call", (tx,)).await
    }

    /// `eth_estimateGas` with an already-populated transaction object.
    pub async fn estimate_gas<T: Serialize>(&self, tx: T) -> Result<RpcResponse> {
        self.send_typed("eth_estimateGas", (tx,)).await
    }

    /// `eth_sendRawTransaction` with signed transaction hex.
    pub async fn send_raw_transaction(&self, raw_tx: &str) -> Result<RpcResponse> {
        self.send_typed("eth_sendRawTransaction", (raw_tx,)).await
    }

    pub async fn chain_id(&self) -> Result<RpcResponse> {
        self.send_typed("eth_chainId", json!([])).await
    }

    /// Nonce of `address` at the `latest` block.
    pub async fn transaction_count(&self, address: &str) -> Result<RpcResponse> {
        self.send_typed("eth_getTransactionCount", (address, "latest")).await
    }

    async fn post(&self, body: Vec<u8>) -> Result<Value> {
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => {
                if !status.is_success() {
                    warn!("Node answered with status {} and a JSON body", status);
                }
                Ok(value)
            }
            Err(_) => Err(RpcError::UnexpectedBody {
                status: status.as_u16(),
                body: text,
            }),
        }
    }
}
