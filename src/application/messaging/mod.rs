//! Message handling - Chat line classification and routing

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{ChatDispatcher, DispatchTargets};
pub use parser::{tokenize, MessageParser};
