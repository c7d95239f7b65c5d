//! Internal HTTP layer for Dropbox API communication.
//!
//! Only the transport types and [`check_response`](error_helpers::check_response)
//! are re-exported from the crate root; the rest is implementation detail.

pub(crate) mod common;
pub(crate) mod error_helpers;
pub(crate) mod loud_wire;
pub(crate) mod transport;
