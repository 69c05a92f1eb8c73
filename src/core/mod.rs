//! Core application primitives (HTTP surface, server bootstrap)

pub mod http;

pub use http::*;
