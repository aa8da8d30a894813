//! One function per subcommand, each returning the process exit code.

mod pipe;
mod purge;

pub use pipe::cmd_pipe;
pub use purge::cmd_purge;
