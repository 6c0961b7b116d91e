//! Infrastructure layer providing external integrations.
//!
//! This module contains the HTTP client for the assistant backend and the
//! storage backends that hold persisted sessions.

pub mod clients;
pub mod storage;
