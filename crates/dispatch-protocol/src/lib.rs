//! dispatch-protocol: wire types and the length-prefixed frame codec shared
//! between the dispatcher service and anything that dials into it as a
//! worker (production workers, test harnesses).

pub mod codec;
pub mod envelope;
pub mod frame;
pub mod http_api;

pub use codec::{read_frame, write_frame, CodecError, DEFAULT_MAX_FRAME_BYTES};
pub use envelope::RequestEnvelope;
pub use frame::{tag, ErrorPayload, Frame, RegPayload};
pub use http_api::{ClientInfo, ClientsResponse, RegisterRequest, RegisterResponse};
