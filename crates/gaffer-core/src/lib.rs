//! Gaffer Core - Shared types, errors, and configuration
//!
//! This crate provides the foundational data structures used across
//! the gaffer FPL Discord bot.

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{GafferError, Result};
pub use models::ServerConfig;
