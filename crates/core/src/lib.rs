//! Marigold Core - Shared types library.
//!
//! This crate provides common types used across all Marigold components:
//! - `api` - Public JSON API for the storefront
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. The order status machine, checkout step machine,
//! and money arithmetic live here so they can be tested without a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, money, order status, checkout steps

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
