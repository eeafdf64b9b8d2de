//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Command registry, player store and directory
//! - Messaging: Chat line tokenizing and dispatching
//! - Context: The per-server object tying it all together
//! - Errors: Domain-specific errors

pub mod context;
pub mod errors;
pub mod messaging;
pub mod services;

pub use context::BridgeContext;
