//! Peer synchronization: wire frames and the transport seam sessions are built on.

pub mod channel;
pub mod event;

pub use channel::{Inbound, MemoryChannel, OfflineChannel, SyncChannel};
pub use event::{PlayerMove, Position, SyncEvent};
