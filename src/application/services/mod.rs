//! Application services - Commands and players

pub mod command_registry;
pub mod player_directory;
pub mod player_store;

pub use command_registry::CommandRegistry;
pub use player_directory::PlayerDirectory;
pub use player_store::PlayerStore;
