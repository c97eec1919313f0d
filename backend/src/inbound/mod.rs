//! Inbound adapters that translate external requests into user store calls
//! while keeping framework details at the edge.
//!
//! The console adapter lives under [`cli`].

pub mod cli;
