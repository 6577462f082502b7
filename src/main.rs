//! Node error envelope CLI
//!
//! Sends one JSON-RPC request to a node and reports the envelope it gets back.

use anyhow::bail;
use clap::Parser;
use node_error_probe::expect::CATALOG;
use node_error_probe::types::parse_hex_u64;
use node_error_probe::{Expected, Network, NodeConfig, RevertData, RpcClient, RpcResponse};
use serde_json::Value;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Send one JSON-RPC request and report the envelope the node returns
#[derive(Parser, Debug)]
#[command(name = "node-error-probe", version, about)]
struct Cli {
    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Fail unless the response matches this catalog entry
    #[arg(long, value_name = "NAME", value_parser = parse_expected)]
    expect: Option<&'static Expected>,

    /// Network whose endpoint and key are read from the environment
    #[arg(long, env = "NETWORK", default_value = "localReth", value_parser = parse_network)]
    network: Network,

    /// JSON-RPC method name
    #[arg(default_value = "eth_chainId")]
    method: String,

    /// Params as a JSON array or object
    #[arg(value_parser = parse_params, default_value = "[]")]
    params: Value,
}

fn parse_expected(name: &str) -> Result<&'static Expected, String> {
    Expected::by_name(name).ok_or_else(|| {
        let known: Vec<_> = CATALOG.iter().map(|e| e.name).collect();
        format!("unknown expectation {:?}, known: {}", name, known.join(", "))
    })
}

fn parse_network(raw: &str) -> Result<Network, String> {
    raw.parse().map_err(|e: node_error_probe::RpcError| e.to_string())
}

fn parse_params(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("params are not valid JSON: {}", e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = NodeConfig::from_env(cli.network)?;

    info!("Network: {:?}", config.network);
    info!("RPC endpoint: {}", config.rpc_url);

    let client = RpcClient::new(&config.rpc_url)?;

    let body = client.send(&cli.method, &cli.params).await?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    let Some(response) = read_reply(&cli.method, body, cli.expect)? else {
        return Ok(());
    };
    report(&cli.method, &response, config.chain_id);

    if let Some(expected) = cli.expect {
        expected.check(&response)?;
        info!("Response matches {}", expected.name);
    }

    Ok(())
}

/// A completed exchange whose body is not an envelope is only a failure
/// when there is an expectation to check it against.
fn read_reply(
    method: &str,
    body: Value,
    expect: Option<&Expected>,
) -> anyhow::Result<Option<RpcResponse>> {
    match RpcResponse::from_reply(body) {
        Ok(response) => Ok(Some(response)),
        Err(e) => {
            warn!("Response to {} is not a valid envelope: {}", method, e);
            if let Some(expected) = expect {
                bail!("cannot check {}: {}", expected.name, e);
            }
            Ok(None)
        }
    }
}

fn report(method: &str, response: &RpcResponse, chain_id: Option<u64>) {
    match response {
        RpcResponse::Success(success) => {
            info!("{} succeeded", method);
            if method == "eth_chainId" {
                let reported = success.result.as_str().and_then(parse_hex_u64);
                match (reported, chain_id) {
                    (Some(actual), Some(configured)) if actual != configured => {
                        warn!("Node reports chain {} but {} is configured", actual, configured)
                    }
                    (Some(actual), _) => info!("Chain id: {}", actual),
                    (None, _) => warn!("Unreadable chain id: {}", success.result),
                }
            }
        }
        RpcResponse::Error(failure) => {
            let error = &failure.error;
            info!(
                "{} returned error code={} kind={:?}: {}",
                method,
                error.code,
                error.kind(),
                error.message
            );
            if let Some(data) = error.data_hex() {
                match RevertData::decode(data) {
                    Ok(revert) => info!("Revert data: {}", revert),
                    Err(e) => warn!("Undecodable error data {}: {}", data, e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;
    use serde_json::json;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("node-error-probe").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_chain_id() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.method, "eth_chainId");
        assert_eq!(cli.params, json!([]));
        assert!(!cli.verbose);
        assert!(cli.expect.is_none());
    }

    #[test]
    fn test_method_params_and_expectation() {
        let cli = parse(&[
            "--expect",
            "nonce-too-low",
            "--network",
            "cfx8889",
            "eth_sendRawTransaction",
            r#"["0xf86c80"]"#,
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.method, "eth_sendRawTransaction");
        assert_eq!(cli.params, json!(["0xf86c80"]));
        assert_eq!(cli.network, Network::Cfx8889);
        assert!(cli.verbose);
        assert_eq!(cli.expect.unwrap().code, -32003);

        let cli = parse(&["--expect=invalid-chain-id", "eth_sendRawTransaction"]).unwrap();
        assert_eq!(cli.expect.unwrap().message, "invalid chain ID");
    }

    #[test]
    fn test_flags_are_never_sent_as_methods() {
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(
            parse(&["--exepct", "nonce-too-low"]).unwrap_err().kind(),
            ErrorKind::UnknownArgument
        );
    }

    #[test]
    fn test_non_envelope_body_only_fails_an_expectation() {
        let expected = Expected::by_name("nonce-too-low").unwrap();
        for body in [json!("oops"), json!({"id": 1}), json!({"id": 7, "result": "0x1"})] {
            assert!(read_reply("eth_chainId", body.clone(), None).unwrap().is_none());
            assert!(read_reply("eth_chainId", body, Some(expected)).is_err());
        }

        let body = json!({"jsonrpc": "2.0", "id": 1, "result": "0x22b9"});
        let response = read_reply("eth_chainId", body, None).unwrap().unwrap();
        assert_eq!(response.result(), Some(&json!("0x22b9")));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(parse(&["--expect"]).is_err());
        assert!(parse(&["--expect", "gas-too-big"]).is_err());
        assert!(parse(&["--network", "mainnet"]).is_err());
        assert!(parse(&["eth_call", "[not json"]).is_err());
        assert!(parse(&["a", "[]", "extra"]).is_err());
    }
}
