//! TouchFabric Dispatch
//!
//! Sends each frame's touches to the listener as OSC messages:
//!
//! - [`osc`]: encoding and decoding of `/touches` packets
//! - [`transport`]: fire-and-forget senders (UDP, in-memory, null)
//! - [`dispatcher`]: batching and the idle heartbeat policy
//!
//! Nothing here retries or blocks; a failed send is logged and dropped.

pub mod dispatcher;
pub mod osc;
pub mod transport;

pub use dispatcher::{BatchDispatcher, DispatchOutcome, DispatchState, DEFAULT_BATCH_SIZE};
pub use transport::{MemoryTransport, NullTransport, OscUdpTransport, SentMessage, Transport};
