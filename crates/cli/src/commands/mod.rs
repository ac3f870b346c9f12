//! CLI command implementations.

mod classify;
mod generate;
mod print;

pub use classify::classify;
pub use generate::generate;
pub use print::{print_command, shell_quote};
