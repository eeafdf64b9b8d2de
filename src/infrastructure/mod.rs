//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: Player record persistence
//! - Lang: Localized message tables
//! - Adapters: Host integrations (console)

pub mod adapters;
pub mod config;
pub mod lang;
pub mod storage;
