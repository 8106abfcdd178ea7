//! Wire types shared with the remote collection endpoint.
//!
//! - [`record`] - [`Record`] and its opaque [`RecordId`]
//! - [`request`] - JSON bodies sent on create and update

pub mod record;
pub mod request;

pub use record::*;
pub use request::*;
