//! Core types for lectern.

mod document;
mod request;
mod result;
mod scope;

pub use document::*;
pub use request::*;
pub use result::*;
pub use scope::*;
