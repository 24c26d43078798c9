//! The injected transport seam and the two in-process implementations.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tracing::debug;

use crate::error::SyncError;

use super::event::SyncEvent;

/// What a channel hands back on each poll.
#[derive(Debug)]
pub enum Inbound {
    Connected,
    Disconnected,
    Event(SyncEvent),
    Malformed(SyncError),
}

/// Bidirectional peer transport.
///
/// Publication is fire-and-forget: no acknowledgement, retry or backpressure.
pub trait SyncChannel {
    fn publish(&mut self, event: &SyncEvent);

    /// Everything that arrived since the previous poll, in arrival order.
    fn poll(&mut self) -> Vec<Inbound>;

    /// Releases the transport. Later publishes are dropped and polls return nothing.
    fn teardown(&mut self);
}

/// Single-player transport: never connects, drops every publish.
#[derive(Debug, Default)]
pub struct OfflineChannel;

impl SyncChannel for OfflineChannel {
    fn publish(&mut self, event: &SyncEvent) {
        debug!(event = event.kind(), "offline, dropping outbound event");
    }

    fn poll(&mut self) -> Vec<Inbound> {
        Vec::new()
    }

    fn teardown(&mut self) {}
}

/// One end of an in-memory duplex link carrying encoded frames.
pub struct MemoryChannel {
    outbound: Option<Sender<String>>,
    inbound: Option<Receiver<String>>,
    announced: bool,
}

impl MemoryChannel {
    pub fn pair() -> (Self, Self) {
        let (left_tx, right_rx) = mpsc::channel();
        let (right_tx, left_rx) = mpsc::channel();
        (Self::new(left_tx, left_rx), Self::new(right_tx, right_rx))
    }

    fn new(outbound: Sender<String>, inbound: Receiver<String>) -> Self {
        Self { outbound: Some(outbound), inbound: Some(inbound), announced: false }
    }

    /// Pushes a raw frame, bypassing the encoder.
    pub fn send_raw(&mut self, frame: impl Into<String>) {
        if let Some(sender) = &self.outbound
            && sender.send(frame.into()).is_err()
        {
            debug!("peer gone, dropping raw frame");
        }
    }
}

impl SyncChannel for MemoryChannel {
    fn publish(&mut self, event: &SyncEvent) {
        let Some(sender) = &self.outbound else {
            return;
        };
        match event.encode() {
            Ok(frame) => {
                if sender.send(frame).is_err() {
                    debug!(event = event.kind(), "peer gone, dropping outbound event");
                }
            }
            Err(err) => debug!(%err, "dropping unencodable event"),
        }
    }

    fn poll(&mut self) -> Vec<Inbound> {
        let Some(receiver) = &self.inbound else {
            return Vec::new();
        };

        let mut received = Vec::new();
        if !self.announced {
            self.announced = true;
            received.push(Inbound::Connected);
        }

        loop {
            match receiver.try_recv() {
                Ok(frame) => received.push(match SyncEvent::decode(&frame) {
                    Ok(event) => Inbound::Event(event),
                    Err(err) => Inbound::Malformed(err),
                }),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    received.push(Inbound::Disconnected);
                    self.inbound = None;
                    self.outbound = None;
                    break;
                }
            }
        }
        received
    }

    fn teardown(&mut self) {
        self.outbound = None;
        self.inbound = None;
    }
}
