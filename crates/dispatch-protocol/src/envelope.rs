//! Self-describing JSON payloads carried inside frame `msg` bytes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Payload of a `REQUEST` frame: the HTTP call the dispatcher forwards to a
/// worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub request_id: i32,
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    #[serde(with = "crate::frame::base64_bytes")]
    pub body: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_envelope_round_trips() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_owned(), "application/json".to_owned());
        let env = RequestEnvelope {
            request_id: 5,
            method: "GET".to_owned(),
            path: "/stocks/AAPL".to_owned(),
            headers,
            body: b"".to_vec(),
        };
        let json = serde_json::to_string(&env).unwrap();
        let back: RequestEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(env, back);
    }
}
