//! Configuration management for the chat client.
//!
//! Values are layered from built-in defaults, an optional `config.toml`, and
//! command-line flags, then read anywhere through [`Config::get`].

mod config;

pub use config::*;
