//! Test harness for exercising the dispatcher without a real worker
//! application: a raw-TCP client that speaks the frame protocol directly.

mod mock_worker;

pub use mock_worker::MockWorker;
