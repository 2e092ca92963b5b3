//! Command handlers for CLI operations

pub mod check;
pub mod command;
pub mod run;

pub use check::CheckCommandHandler;
pub use command::ApplyCommandHandler;
pub use run::RunCommandHandler;
