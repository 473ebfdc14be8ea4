//! Per-frame batching of touches into `/touches` messages.
//!
//! Touches are accumulated into a batch that is sent as soon as it reaches
//! the batch size. Whatever remains after the frame's touches, possibly
//! nothing, is always sent as a final message. So 12 touches with a batch
//! size of 5 go out as 5, 5 and 2, and 10 touches as 5, 5 and `[]`.
//!
//! Frames without touches send a single `[]` heartbeat when touches
//! disappear, then stay silent until touches return.

use touchfabric_common::error::TouchFabricError;
use touchfabric_model::touch::{encode_batch, Touch};

use crate::transport::Transport;

/// Batch size listeners expect by default.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Heartbeat state of the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchState {
    /// Nothing dispatched yet. An empty first frame sends one heartbeat.
    #[default]
    Startup,
    /// The last frame had touches.
    Active,
    /// The heartbeat was sent and no touches have appeared since.
    Idle,
}

/// What one `dispatch` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// Messages handed to the transport successfully.
    pub messages: usize,
    /// Touches carried by those messages.
    pub touches: usize,
    /// Messages dropped because encoding or sending failed.
    pub failures: usize,
}

/// Batches touches and hands them to a transport.
pub struct BatchDispatcher<X: Transport> {
    transport: X,
    address: String,
    batch_size: usize,
    state: DispatchState,
    messages_sent: u64,
    send_failures: u64,
}

impl<X: Transport> BatchDispatcher<X> {
    /// Create a dispatcher sending to `address`. `batch_size` is clamped to at least 1.
    pub fn new(transport: X, address: impl Into<String>, batch_size: usize) -> Self {
        Self {
            transport,
            address: address.into(),
            batch_size: batch_size.max(1),
            state: DispatchState::Startup,
            messages_sent: 0,
            send_failures: 0,
        }
    }

    /// Dispatcher with the default `/touches` address and batch size.
    pub fn with_defaults(transport: X) -> Self {
        Self::new(transport, "/touches", DEFAULT_BATCH_SIZE)
    }

    /// Send one frame's touches.
    pub fn dispatch(&mut self, touches: &[Touch]) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        if touches.is_empty() {
            if self.state == DispatchState::Idle {
                return outcome;
            }
            self.state = DispatchState::Idle;
            tracing::debug!("Touches gone, sending heartbeat");
            self.flush(&mut Vec::new(), &mut outcome);
            return outcome;
        }

        self.state = DispatchState::Active;
        let mut batch = Vec::with_capacity(self.batch_size);
        for touch in touches {
            batch.push(*touch);
            if batch.len() >= self.batch_size {
                self.flush(&mut batch, &mut outcome);
            }
        }
        self.flush(&mut batch, &mut outcome);
        outcome
    }

    fn flush(&mut self, batch: &mut Vec<Touch>, outcome: &mut DispatchOutcome) {
        let count = batch.len();
        let result = encode_batch(batch)
            .map_err(TouchFabricError::from)
            .and_then(|payload| self.transport.send(&self.address, &payload));
        batch.clear();

        match result {
            Ok(()) => {
                outcome.messages += 1;
                outcome.touches += count;
                self.messages_sent += 1;
            }
            Err(e) => {
                outcome.failures += 1;
                self.send_failures += 1;
                tracing::warn!(
                    error = %e,
                    destination = %self.transport.destination(),
                    touches = count,
                    "Dropped touch batch"
                );
            }
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Messages sent since creation.
    pub fn messages_sent(&self) -> u64 {
        self.messages_sent
    }

    /// Messages dropped since creation.
    pub fn send_failures(&self) -> u64 {
        self.send_failures
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut X {
        &mut self.transport
    }
}
