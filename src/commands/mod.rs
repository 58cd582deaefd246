//! CLI command implementations
//!
//! Every command except the listings works on a connected
//! [`Session`](oceanctl_session::Session) and leaves it connected; `main`
//! disconnects afterwards.

pub mod acquire;
pub mod info;
mod list;

pub use list::{list_devices, list_drivers};
