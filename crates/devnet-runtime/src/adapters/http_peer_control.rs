//! # HTTP Peer Control
//!
//! `PeerControlApi` over a node's CometBFT RPC port.

use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use dn_03_peer_mesh::{DialRequest, PeerControlApi, PeerMeshError};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::ControlApiConfig;

pub struct HttpPeerControl {
    client: Client,
    port: u16,
}

impl HttpPeerControl {
    pub fn new(config: &ControlApiConfig) -> Result<Self, PeerMeshError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| PeerMeshError::ControlApi {
                target: "client".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            port: config.port,
        })
    }

    fn url(&self, target: IpAddr, path_and_query: &str) -> String {
        format!("http://{}{}", SocketAddr::new(target, self.port), path_and_query)
    }

    async fn get_json(&self, target: IpAddr, path_and_query: &str) -> Result<Value, PeerMeshError> {
        let url = self.url(target, path_and_query);
        let response = self.client.get(&url).send().await.map_err(|e| {
            let reason = if e.is_connect() {
                format!("cannot connect to {}", url)
            } else {
                e.to_string()
            };
            PeerMeshError::ControlApi {
                target: target.to_string(),
                reason,
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| PeerMeshError::InvalidResponse {
            target: target.to_string(),
            reason: e.to_string(),
        })?;
        interpret_response(target, status, &text)
    }
}

/// Status first: an error status never reaches the JSON decoder unless
/// its body is a JSON-RPC error.
fn interpret_response(target: IpAddr, status: StatusCode, text: &str) -> Result<Value, PeerMeshError> {
    if !status.is_success() {
        let reason = serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|body| rpc_error(&body))
            .map(|error| format!("HTTP {}: {}", status, error))
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(PeerMeshError::ControlApi {
            target: target.to_string(),
            reason,
        });
    }

    let body: Value = serde_json::from_str(text).map_err(|e| PeerMeshError::InvalidResponse {
        target: target.to_string(),
        reason: e.to_string(),
    })?;
    if let Some(error) = rpc_error(&body) {
        return Err(PeerMeshError::ControlApi {
            target: target.to_string(),
            reason: error,
        });
    }
    Ok(body)
}

#[async_trait]
impl PeerControlApi for HttpPeerControl {
    async fn dial_peers(&self, target: IpAddr, request: &DialRequest) -> Result<(), PeerMeshError> {
        debug!(%target, peers = request.peers.len(), "dialing peers");
        self.get_json(target, &request.path_and_query()).await.map(|_| ())
    }

    async fn node_id(&self, target: IpAddr) -> Result<String, PeerMeshError> {
        let body = self.get_json(target, "/status").await?;
        status_node_id(&body).ok_or_else(|| PeerMeshError::InvalidResponse {
            target: target.to_string(),
            reason: "missing result.node_info.id".to_string(),
        })
    }
}

/// JSON-RPC error message, if the body carries one.
fn rpc_error(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    if error.is_null() {
        return None;
    }
    let message = error.get("message").and_then(Value::as_str).unwrap_or("rpc error");
    Some(match error.get("data").and_then(Value::as_str) {
        Some(data) => format!("{}: {}", message, data),
        None => message.to_string(),
    })
}

fn status_node_id(body: &Value) -> Option<String> {
    body.pointer("/result/node_info/id")
        .and_then(Value::as_str)
        .map(str::to_string)
}
