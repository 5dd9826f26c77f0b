//! Adapter implementations of the port traits.
//!
//! - `live`: real processes, HTTP and disk
//! - `recording`: wraps another adapter and captures every call to a cassette
//! - `replaying`: serves calls from a cassette without touching the network

pub mod live;
pub mod recording;
pub mod replaying;
