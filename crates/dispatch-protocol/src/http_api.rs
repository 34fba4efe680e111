//! Frozen schema types for the HTTP front door's own endpoints
//! (`/register`, `/clients`) — as opposed to the request the front door
//! forwards *to* a worker, which is [`crate::envelope::RequestEnvelope`].

use serde::{Deserialize, Serialize};

/// `POST /register` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub client_id: String,
    #[serde(rename = "Paths")]
    pub paths: Vec<String>,
}

/// `POST /register` response body.
///
/// Field casing matches the wire contract exactly (`ClientId`/`Paths`/`TcpPort`,
/// not the `register` request body's `client_id`) — this is the registration
/// handshake's historical shape and this spec does not renormalize it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(rename = "ClientId")]
    pub client_id: String,
    #[serde(rename = "Paths")]
    pub paths: Vec<String>,
    #[serde(rename = "TcpPort")]
    pub tcp_port: u16,
}

/// One entry in `GET /clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub client_id: String,
    pub registered_paths: Vec<String>,
}

/// `GET /clients` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientsResponse {
    pub total_clients: usize,
    pub clients: Vec<ClientInfo>,
}
