use dispatch_protocol::{read_frame, tag, write_frame, CodecError, Frame, RegPayload, DEFAULT_MAX_FRAME_BYTES};
use std::net::SocketAddr;
use tokio::net::TcpStream;

/// A worker client for tests: dials the dispatcher's TCP port, speaks the
/// WELCOME/REG handshake, and lets the test drive REQUEST/RESPONSE traffic
/// directly instead of running a real application callback.
///
/// Modeled on the teacher's `MockWsClient`, adapted from a WebSocket dial to
/// a raw TCP dial against the dispatcher's frame codec.
pub struct MockWorker {
    stream: TcpStream,
    max_frame_bytes: u32,
}

impl MockWorker {
    pub async fn connect(addr: SocketAddr) -> std::io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self { stream, max_frame_bytes: DEFAULT_MAX_FRAME_BYTES })
    }

    /// Read the server's WELCOME frame, which must be the first frame on
    /// any new connection.
    pub async fn read_welcome(&mut self) -> Result<Frame, CodecError> {
        let frame = self.recv_frame().await?;
        assert_eq!(frame.sub, tag::WELCOME, "expected WELCOME as the first frame");
        Ok(frame)
    }

    /// Send a REG frame for `client_id`/`paths` and return the server's
    /// REG_RESPONSE.
    pub async fn register(
        &mut self,
        client_id: &str,
        paths: Vec<String>,
    ) -> Result<Frame, CodecError> {
        let payload = serde_json::to_vec(&RegPayload { client_id: client_id.to_owned(), paths })
            .expect("RegPayload always serializes");
        self.send_frame(&Frame::new(tag::REG, payload, 0)).await?;
        self.recv_frame().await
    }

    /// Connect, read WELCOME, and register in one call — the common case
    /// for tests that don't need to probe the handshake itself.
    pub async fn connect_and_register(
        addr: SocketAddr,
        client_id: &str,
        paths: Vec<String>,
    ) -> Result<Self, CodecError> {
        let mut worker = Self::connect(addr).await.map_err(CodecError::Io)?;
        worker.read_welcome().await?;
        let reg_response = worker.register(client_id, paths).await?;
        assert_eq!(reg_response.sub, tag::REG_RESPONSE, "registration should be acknowledged");
        Ok(worker)
    }

    pub async fn send_frame(&mut self, frame: &Frame) -> Result<(), CodecError> {
        write_frame(&mut self.stream, frame).await
    }

    pub async fn recv_frame(&mut self) -> Result<Frame, CodecError> {
        read_frame(&mut self.stream, self.max_frame_bytes).await
    }

    /// Wait for the next `REQUEST` frame, skipping any interleaved
    /// HEARTBEAT frames (replying to each so the session stays healthy).
    pub async fn recv_request(&mut self) -> Result<Frame, CodecError> {
        loop {
            let frame = self.recv_frame().await?;
            match frame.sub.as_str() {
                tag::REQUEST => return Ok(frame),
                tag::HEARTBEAT => {
                    self.send_frame(&Frame::heartbeat_response(frame.msg.clone())).await?;
                }
                _ => return Ok(frame),
            }
        }
    }

    /// Reply to `request_id` with a successful RESPONSE frame.
    pub async fn respond_ok(&mut self, request_id: i32, body: Vec<u8>) -> Result<(), CodecError> {
        self.send_frame(&Frame::response(request_id, body)).await
    }

    /// Reply to `request_id` with an ERROR frame.
    pub async fn respond_error(
        &mut self,
        request_id: i32,
        message: &str,
    ) -> Result<(), CodecError> {
        let frame = Frame::error(request_id, message)?;
        self.send_frame(&frame).await
    }

    /// Close the underlying connection, simulating a worker disconnect.
    pub async fn disconnect(self) {
        drop(self.stream);
    }
}
