//! In-process caches for embeddings and whole retrievals.
//!
//! Both caches share one policy ([`TtlCache`]) and take their time source
//! by injection, so tests drive expiry with a [`ManualClock`]. Instances
//! are constructed once per process and passed by reference into the
//! retrieval service and hybrid searcher; there is no module-global
//! state. Single-process only; nothing here coordinates across
//! processes.

mod clock;
mod embedding;
mod result;
mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use embedding::EmbeddingCache;
pub use result::ResultCache;
pub use ttl::{CacheStats, TtlCache, DEFAULT_TTL, MAX_CACHE_SIZE};
