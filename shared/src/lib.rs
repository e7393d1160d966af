//! Shared types for the laundry management server
//!
//! Domain models, request/response DTOs and small utilities used by the
//! server crate and its integration tests.

pub mod client;
pub mod models;
pub mod util;

pub use serde::{Deserialize, Serialize};
