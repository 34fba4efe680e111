//! Wire frame: the unit of communication on a worker's persistent TCP
//! connection.
//!
//! On the wire a frame is `[u32 big-endian length][JSON body]`, where the
//! JSON body is `{"sub": "<TAG>", "msg": "<base64 bytes>", "request": <i32>}`.
//! `sub` is a free-form tag, not a closed enum — an unrecognized tag must
//! still decode successfully so the reader loop can log it and move on
//! rather than tearing down the session (see [`tag`]).

use serde::{Deserialize, Serialize};

/// Frame tags in the frozen v1 protocol (the complete set from the spec).
pub mod tag {
    pub const WELCOME: &str = "WELCOME";
    pub const REG: &str = "REG";
    pub const REG_RESPONSE: &str = "REG_RESPONSE";
    pub const REQUEST: &str = "REQUEST";
    pub const RESPONSE: &str = "RESPONSE";
    pub const ERROR: &str = "ERROR";
    pub const HEARTBEAT: &str = "HEARTBEAT";
    pub const HEARTBEAT_RESPONSE: &str = "HEARTBEAT_RESPONSE";
}

/// Serde helper for fields that are base64 strings on the wire but `Vec<u8>`
/// in Rust. Shared by [`Frame::msg`] and [`crate::envelope::RequestEnvelope::body`].
pub mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(d)?;
        STANDARD.decode(text.as_bytes()).map_err(serde::de::Error::custom)
    }
}

use base64_bytes as msg_base64;

/// One length-prefixed JSON message on the TCP stream.
///
/// `request` is 0 for frames that carry no request/response correlation
/// (WELCOME, REG, REG_RESPONSE, HEARTBEAT, HEARTBEAT_RESPONSE).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub sub: String,
    #[serde(with = "msg_base64")]
    pub msg: Vec<u8>,
    #[serde(default)]
    pub request: i32,
}

impl Frame {
    pub fn new(sub: impl Into<String>, msg: Vec<u8>, request: i32) -> Self {
        Self { sub: sub.into(), msg, request }
    }

    pub fn welcome(greeting: impl Into<String>) -> Self {
        Self::new(tag::WELCOME, greeting.into().into_bytes(), 0)
    }

    pub fn reg_response(message: impl Into<String>) -> Self {
        Self::new(tag::REG_RESPONSE, message.into().into_bytes(), 0)
    }

    pub fn heartbeat(payload: Vec<u8>) -> Self {
        Self::new(tag::HEARTBEAT, payload, 0)
    }

    pub fn heartbeat_response(payload: Vec<u8>) -> Self {
        Self::new(tag::HEARTBEAT_RESPONSE, payload, 0)
    }

    pub fn request(request_id: i32, msg: Vec<u8>) -> Self {
        Self::new(tag::REQUEST, msg, request_id)
    }

    pub fn response(request_id: i32, msg: Vec<u8>) -> Self {
        Self::new(tag::RESPONSE, msg, request_id)
    }

    pub fn error(request_id: i32, message: impl Into<String>) -> serde_json::Result<Self> {
        let payload = serde_json::to_vec(&ErrorPayload { error: message.into() })?;
        Ok(Self::new(tag::ERROR, payload, request_id))
    }
}

/// Payload of an `ERROR` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

/// Payload of a `REG` frame.
///
/// `Paths` keeps the original casing from the wire contract (no JSON
/// convention was applied to it upstream; this spec's HTTP API mirrors it
/// verbatim rather than silently renaming it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegPayload {
    pub client_id: String,
    #[serde(rename = "Paths")]
    pub paths: Vec<String>,
}
