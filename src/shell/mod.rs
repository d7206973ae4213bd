//! External command execution.

pub mod command;
pub mod mock;
pub mod path;
pub mod platform;
pub mod runner;

pub use command::{execute, CommandOptions, CommandResult, CommandSpec};
pub use mock::MockRunner;
pub use path::{find_program, find_program_in};
pub use platform::is_ci;
pub use runner::{CommandRunner, DryRunRunner, SystemRunner};
