use clap::{arg, command, value_parser, ArgGroup, ArgMatches, Command};

use crate::command_runner::StreamBinding;
use crate::error::{Error, ErrorKind, Result};
use std::{ffi::OsString, num::NonZeroI32, path::PathBuf};

// everything the binary needs to know about one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    // the program to run, resolved through PATH
    pub program: OsString,
    // passed through to the program untouched, even if not UTF-8
    pub args: Vec<OsString>,
    // run inside this directory instead of the current one
    pub dir: Option<PathBuf>,
    pub binding: StreamBinding,
    // exit status used when the program fails
    pub exit_code: NonZeroI32,
    pub verbose: bool,
}

pub fn build_cli() -> Command {
    command!()
        .arg(
            arg!(-C --dir <DIR> "Run the program inside this directory")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(-o --"bind-output" "Show the program's stdout and stderr"))
        .arg(arg!(-i --interactive "Also connect stdin, for interactive programs"))
        .group(ArgGroup::new("binding").args(["bind-output", "interactive"]))
        .arg(
            arg!(--"exit-code" <CODE> "Exit status to use when the program fails")
                .value_parser(value_parser!(NonZeroI32))
                .default_value("1"),
        )
        .arg(arg!(-v --verbose "Log what is being run to stderr"))
        // not optional. everything after the program name belongs to the program
        .arg(
            arg!(<COMMAND> ... "The program to run, followed by its arguments")
                .value_parser(value_parser!(OsString))
                .trailing_var_arg(true),
        )
}

pub fn parse_args() -> Result<CliArgs> {
    cli_args_from_matches(&build_cli().get_matches())
}

pub fn parse_args_from<I, T>(itr: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_cli()
        .try_get_matches_from(itr)
        .map_err(|err| Error::new(ErrorKind::GenericCli(err.to_string())))?;
    cli_args_from_matches(&matches)
}

fn cli_args_from_matches(matches: &ArgMatches) -> Result<CliArgs> {
    let mut command = matches
        .get_many::<OsString>("COMMAND")
        .map(|values| values.cloned())
        .into_iter()
        .flatten();

    let program = command
        .next()
        .ok_or_else(|| Error::new(ErrorKind::GenericCli("missing COMMAND".into())))?;
    let args = command.collect();

    let binding = if matches.get_flag("interactive") {
        StreamBinding::InputOutput
    } else if matches.get_flag("bind-output") {
        StreamBinding::Output
    } else {
        StreamBinding::None
    };

    let exit_code = matches
        .get_one::<NonZeroI32>("exit-code")
        .copied()
        .ok_or_else(|| Error::new(ErrorKind::GenericCli("missing --exit-code".into())))?;

    Ok(CliArgs {
        program,
        args,
        dir: matches.get_one::<PathBuf>("dir").cloned(),
        binding,
        exit_code,
        verbose: matches.get_flag("verbose"),
    })
}
