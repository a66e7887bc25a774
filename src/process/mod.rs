//! Process invocation layer
//!
//! Builds the argument vector for the external CLI from an agent profile,
//! locates the executable, and wraps the spawned child so its stdout can be
//! consumed as a real-time line stream while stderr is collected in the
//! background.

pub mod child;
pub mod command;
pub mod locate;

pub use child::AgentProcess;
pub use command::{CommandBuilder, SystemInstruction};
pub use locate::locate_cli;
