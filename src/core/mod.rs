pub mod action;
pub mod command;
pub mod module;
pub mod session;

pub use action::{Action, NotifyLevel};
pub use command::{parse_command, Command};
pub use module::Module;
pub use session::Session;
