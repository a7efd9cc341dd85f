//! Session registry and client handle seam.
//!
//! The registry is the single authoritative view of live sessions: a shared
//! mapping from session identifier to client handle. Entries are inserted by
//! the bootstrap routine and removed by the teardown coordinator; removal of
//! an absent key is a no-op, so both can run concurrently without external
//! locking. Identifier enumeration is derived from the persisted token store,
//! not from the live map, so it reflects sessions that exist on disk even if
//! they are not currently loaded.

pub mod client;
pub mod store;


pub use client::SessionClient;
pub use store::SessionRegistry;
