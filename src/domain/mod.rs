//! Domain layer - Core business objects with no I/O
//!
//! This layer contains:
//! - Entities: Commands, players, sessions, chat outcomes
//! - Traits: Abstractions for the host, plugin hooks and storage

pub mod entities;
pub mod traits;
