//! Cinegate - cache-backed, locale-aware movie metadata gateway
//!
//! This library crate exposes config loading for the binary and integration tests.

pub mod config;
