// the error module
pub mod error;

// the command line of the procwrap binary
pub mod cli;

// running external programs, for real or recorded
pub mod command_runner;
pub mod mock_runner;
pub mod working_dir;

// printing a failure and exiting
pub mod reporter;

pub mod logging;

use std::ffi::{OsStr, OsString};

pub use cli::{parse_args, CliArgs};
pub use command_runner::{CommandRunner, RealCommandRunner, StreamBinding};
pub use error::{Error, ErrorKind, Result};
pub use mock_runner::MockCommandRunner;
pub use reporter::{FmtReporter, MockReporter, Reporter};

// Run the program described by `args` through `runner`, picking the
// variant that matches the requested directory and stream binding.
pub fn execute(args: &CliArgs, runner: &dyn CommandRunner) -> Result<()> {
    let program_args: Vec<&OsStr> = args.args.iter().map(OsString::as_os_str).collect();

    match &args.dir {
        Some(dir) => runner.run_in_dir_bound(dir, args.binding, &args.program, &program_args),
        None => runner.run_bound(args.binding, &args.program, &program_args),
    }
}
