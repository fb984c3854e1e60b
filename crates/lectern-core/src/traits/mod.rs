//! Core traits for lectern collaborators.

mod embedder;
mod store;

pub use embedder::*;
pub use store::*;
