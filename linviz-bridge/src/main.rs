//! linviz Bridge
//!
//! Line-delimited JSON-RPC 2.0 over stdio, one request per line.
//!
//! Methods:
//! - initialize: server info and registered operation count
//! - ping: liveness check
//! - ops/list: list operations, optionally filtered by category
//! - ops/help: documentation for one operation, or an overview
//! - ops/call: run an operation with JSON arguments
//!
//! Logs go to stderr so stdout carries protocol traffic only.

use linviz_core::{KernelError, Tolerances};
use linviz_plugin::{CallContext, OpRegistry};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value as JsonValue};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const SERVER_NAME: &str = "linviz";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const CONFIG_ENV: &str = "LINVIZ_CONFIG";

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

// JSON-RPC types
#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    /// `None` only when the member is absent; an explicit `null` is kept
    #[serde(default, deserialize_with = "present_id")]
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    jsonrpc: String,
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl From<KernelError> for RpcError {
    fn from(err: KernelError) -> Self {
        let report = err.report();
        Self {
            code: INVALID_PARAMS,
            message: report.message.clone(),
            data: serde_json::to_value(&report).ok(),
        }
    }
}

/// Registry plus the context every call runs with
struct Bridge {
    registry: OpRegistry,
    ctx: CallContext,
}

impl Bridge {
    fn new(tolerances: Tolerances) -> Self {
        Self {
            registry: linviz_kernel::load_kernel_ops(OpRegistry::new()),
            ctx: CallContext::new(tolerances),
        }
    }
}

/// Tolerances from the file named by `LINVIZ_CONFIG`, defaults when unset
fn load_tolerances() -> Result<Tolerances, KernelError> {
    match env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            tracing::info!(path = %path.display(), "loading tolerances");
            Tolerances::load(&path)
        }
        None => Ok(Tolerances::default()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let tolerances = match load_tolerances() {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e.report(), "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let bridge = Bridge::new(tolerances);
    tracing::info!(
        version = SERVER_VERSION,
        ops = bridge.registry.len(),
        "linviz bridge ready"
    );

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                tracing::info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let Some(response) = handle_line(&bridge, line) else {
                    continue;
                };

                if let Err(e) = write_response(&response) {
                    tracing::error!(error = %e, "failed to write response");
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read input");
                break;
            }
        }
    }

    tracing::info!("bridge shutting down");
    ExitCode::SUCCESS
}

fn write_response(response: &RpcResponse) -> io::Result<()> {
    let text = serde_json::to_string(response)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    stdout.flush()
}

/// Parse and dispatch one line; notifications produce no response
fn handle_line(bridge: &Bridge, line: &str) -> Option<RpcResponse> {
    let request: RpcRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable request");
            return Some(RpcResponse {
                jsonrpc: "2.0".to_string(),
                id: None,
                result: None,
                error: Some(RpcError {
                    code: PARSE_ERROR,
                    message: format!("Parse error: {}", e),
                    data: None,
                }),
            });
        }
    };

    tracing::debug!(method = %request.method, "processing");
    let response = handle_request(bridge, &request);

    if request.id.is_none() {
        tracing::debug!(method = %request.method, "notification processed");
        return None;
    }
    Some(response)
}

fn handle_request(bridge: &Bridge, request: &RpcRequest) -> RpcResponse {
    let result = match request.method.as_str() {
        "initialize" => Ok(handle_initialize(bridge)),
        "initialized" | "ping" => Ok(json!({})),
        "ops/list" => Ok(handle_ops_list(bridge, &request.params)),
        "ops/help" => handle_ops_help(bridge, &request.params),
        "ops/call" => handle_ops_call(bridge, &request.params),
        _ => Err(RpcError {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: None,
            error: Some(e),
        },
    }
}

fn handle_initialize(bridge: &Bridge) -> JsonValue {
    json!({
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
        },
        "operations": bridge.registry.len(),
        "tolerances": bridge.ctx.tolerances,
    })
}

fn string_param<'a>(params: &'a Option<JsonValue>, key: &str) -> Option<&'a str> {
    params
        .as_ref()
        .and_then(|p| p.get(key))
        .and_then(|v| v.as_str())
}

fn handle_ops_list(bridge: &Bridge, params: &Option<JsonValue>) -> JsonValue {
    json!({ "operations": bridge.registry.list_ops(string_param(params, "category")) })
}

fn handle_ops_help(bridge: &Bridge, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
    Ok(bridge.registry.help(string_param(params, "name"))?)
}

fn handle_ops_call(bridge: &Bridge, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
    let name = string_param(params, "name")
        .ok_or_else(|| KernelError::missing_argument("ops/call", "name"))?;

    let empty = json!({});
    let arguments = params
        .as_ref()
        .and_then(|p| p.get("arguments"))
        .unwrap_or(&empty);

    let result = bridge.registry.call_op(name, arguments, &bridge.ctx);
    if let Err(ref e) = result {
        tracing::debug!(op = name, code = e.code(), "operation rejected input");
    }
    Ok(result?)
}
