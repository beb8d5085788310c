//! Shared utilities for the Relay server and client.

pub mod logger;
pub mod time;
