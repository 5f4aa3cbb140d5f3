//! tagsync-source
//!
//! The I/O half of tagsync:
//! - `transport`: page GETs (`reqwest`, or scripted in tests)
//! - `client`: cursor pagination over the catalog dataset listing
//! - `sink`: where converted payloads go
//! - `sync`: the polling worker tying fetch, convert and deliver together

pub mod activity;
pub mod client;
pub mod sink;
pub mod sync;
pub mod transport;

#[cfg(test)]
mod testing;

pub use activity::ActiveFlag;
pub use client::CatalogClient;
pub use sink::{JsonLinesSink, TagSink};
pub use sync::{SyncReport, TagSyncWorker};
pub use transport::{HttpTransport, PageTransport};
