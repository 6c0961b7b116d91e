//! Core domain logic for the chat client.
//!
//! This module contains the session store, the conversation flow and the data
//! models that drive the terminal UI, independent of the terminal and of the
//! HTTP backend.

pub mod models;
pub mod services;
