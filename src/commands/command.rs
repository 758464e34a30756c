//! The [`Command`] trait implemented by every umidedup subcommand, dispatched with
//! `enum_dispatch`.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// Trait implemented by all umidedup CLI commands.
///
/// `command_line` is the full invocation, used for logging.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
