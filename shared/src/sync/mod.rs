//! Cross-request coordination: per-id locks and read coalescing.

pub mod coalescer;
pub mod keyed_mutex;

pub use coalescer::Coalescer;
pub use keyed_mutex::{KeyedGuard, KeyedMutex};
