use crate::{error::IOCause, working_dir::WorkingDirGuard, Error, ErrorKind, Result};
use std::{
    ffi::OsStr,
    path::Path,
    process::{Command, Stdio},
};

// Which of the child's standard streams are connected to ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamBinding {
    // nothing is connected; the child reads and writes the null device
    #[default]
    None,
    // stdout and stderr are visible as the child writes them
    Output,
    // stdin as well, so the child can be interactive
    InputOutput,
}

// Runs external programs. We go through this trait instead of using
// `std::process::Command` directly so callers can be tested with
// `MockCommandRunner`.
//
// Program and arguments are `OsStr` so anything the OS accepts reaches the
// child byte for byte. The named variants take anything `Command::args`
// would; they need a sized receiver, so code holding a `&dyn CommandRunner`
// calls `run_bound`/`run_in_dir_bound` directly.
pub trait CommandRunner {
    fn run_bound(&self, binding: StreamBinding, program: &OsStr, args: &[&OsStr]) -> Result<()>;

    fn run_in_dir_bound(
        &self,
        dir: &Path,
        binding: StreamBinding,
        program: &OsStr,
        args: &[&OsStr],
    ) -> Result<()>;

    fn run<P, S>(&self, program: P, args: &[S]) -> Result<()>
    where
        Self: Sized,
        P: AsRef<OsStr>,
        S: AsRef<OsStr>,
    {
        self.run_bound(StreamBinding::None, program.as_ref(), &os_args(args))
    }

    fn run_with_bound_output<P, S>(&self, program: P, args: &[S]) -> Result<()>
    where
        Self: Sized,
        P: AsRef<OsStr>,
        S: AsRef<OsStr>,
    {
        self.run_bound(StreamBinding::Output, program.as_ref(), &os_args(args))
    }

    fn run_with_bound_input_output<P, S>(&self, program: P, args: &[S]) -> Result<()>
    where
        Self: Sized,
        P: AsRef<OsStr>,
        S: AsRef<OsStr>,
    {
        self.run_bound(StreamBinding::InputOutput, program.as_ref(), &os_args(args))
    }

    fn run_in_dir<P, S>(&self, dir: &Path, program: P, args: &[S]) -> Result<()>
    where
        Self: Sized,
        P: AsRef<OsStr>,
        S: AsRef<OsStr>,
    {
        self.run_in_dir_bound(dir, StreamBinding::None, program.as_ref(), &os_args(args))
    }

    fn run_in_dir_with_bound_output<P, S>(&self, dir: &Path, program: P, args: &[S]) -> Result<()>
    where
        Self: Sized,
        P: AsRef<OsStr>,
        S: AsRef<OsStr>,
    {
        self.run_in_dir_bound(dir, StreamBinding::Output, program.as_ref(), &os_args(args))
    }

    fn run_in_dir_with_bound_input_output<P, S>(
        &self,
        dir: &Path,
        program: P,
        args: &[S],
    ) -> Result<()>
    where
        Self: Sized,
        P: AsRef<OsStr>,
        S: AsRef<OsStr>,
    {
        self.run_in_dir_bound(
            dir,
            StreamBinding::InputOutput,
            program.as_ref(),
            &os_args(args),
        )
    }
}

fn os_args<S: AsRef<OsStr>>(args: &[S]) -> Vec<&OsStr> {
    args.iter().map(|arg| arg.as_ref()).collect()
}

pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run_bound(&self, binding: StreamBinding, program: &OsStr, args: &[&OsStr]) -> Result<()> {
        let mut cmd = Command::new(program);
        cmd.args(args);

        let (stdin, stdout, stderr) = match binding {
            StreamBinding::None => (Stdio::null(), Stdio::null(), Stdio::null()),
            StreamBinding::Output => (Stdio::null(), Stdio::inherit(), Stdio::inherit()),
            StreamBinding::InputOutput => (Stdio::inherit(), Stdio::inherit(), Stdio::inherit()),
        };
        cmd.stdin(stdin).stdout(stdout).stderr(stderr);

        log::debug!("Running {:?} {:?} ({:?})", program, args, binding);
        let status = cmd.status().map_err(|err| {
            Error::new(ErrorKind::Spawn {
                program: program.to_string_lossy().into_owned(),
                cause: IOCause::from(&err),
            })
        })?;

        if !status.success() {
            return Err(Error::new(ErrorKind::NonZeroExit {
                program: program.to_string_lossy().into_owned(),
                code: status.code(),
            }));
        }

        Ok(())
    }

    fn run_in_dir_bound(
        &self,
        dir: &Path,
        binding: StreamBinding,
        program: &OsStr,
        args: &[&OsStr],
    ) -> Result<()> {
        // restored when `_guard` goes out of scope, whatever `run_bound` returns
        let _guard = WorkingDirGuard::enter(dir)?;
        self.run_bound(binding, program, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_ARGS: &[&str] = &[];

    // these stay out of the working directory; see tests/working_dir.rs

    #[test]
    fn test_run_success() {
        let runner = RealCommandRunner;
        assert!(runner.run("true", NO_ARGS).is_ok());
        assert!(runner.run_with_bound_output("sh", &["-c", "exit 0"]).is_ok());
    }

    #[test]
    fn test_run_non_zero_exit() {
        let err = RealCommandRunner
            .run("sh", &["-c", "exit 3"])
            .unwrap_err();
        assert_eq!(
            err.into_kind(),
            ErrorKind::NonZeroExit {
                program: "sh".into(),
                code: Some(3),
            }
        );
    }

    #[test]
    fn test_run_missing_program() {
        let err = RealCommandRunner
            .run("procwrap-no-such-program", &["arg"])
            .unwrap_err();

        assert!(err
            .to_string()
            .starts_with("Unable to start procwrap-no-such-program: "));
        match err.into_kind() {
            ErrorKind::Spawn { program, cause } => {
                assert_eq!(program, "procwrap-no-such-program");
                assert_eq!(cause.kind, std::io::ErrorKind::NotFound);
                assert!(cause.message.contains("os error"));
            }
            other => panic!("expected a spawn error, got {:?}", other),
        }
    }

    #[test]
    fn test_args_are_not_shell_interpreted() {
        // a single argument with spaces and a glob reaches the child untouched
        let result = RealCommandRunner.run(
            "sh",
            &["-c", "test \"$1\" = 'a b *'", "sh", "a b *"],
        );
        assert!(result.is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_args_reach_the_child() {
        use std::{ffi::OsString, os::unix::ffi::OsStringExt};

        // "f" followed by a lone 0xff byte, which is not valid UTF-8
        let arg = OsString::from_vec(vec![b'f', 0xff]);
        let args = [
            OsString::from("-c"),
            OsString::from(r#"test "$(printf %s "$1" | od -An -tx1 | tr -d ' \n')" = 66ff"#),
            OsString::from("sh"),
            arg,
        ];

        assert!(RealCommandRunner.run("sh", &args).is_ok());
    }

    #[test]
    fn test_unbound_run_has_no_stdin() {
        // stdin is the null device, so `read` hits end of file and fails
        let err = RealCommandRunner
            .run("sh", &["-c", "read line"])
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NonZeroExit { .. }));
    }

    #[test]
    fn test_bound_output_has_no_stdin() {
        let err = RealCommandRunner
            .run_with_bound_output("sh", &["-c", "read line"])
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NonZeroExit { .. }));
    }

    #[test]
    fn test_works_through_trait_object() {
        let runner: &dyn CommandRunner = &RealCommandRunner;
        let args = [OsStr::new("-c"), OsStr::new("exit 0")];

        assert!(runner
            .run_bound(StreamBinding::None, OsStr::new("sh"), &args)
            .is_ok());
    }

    #[test]
    fn test_default_binding_is_none() {
        assert_eq!(StreamBinding::default(), StreamBinding::None);
    }
}
