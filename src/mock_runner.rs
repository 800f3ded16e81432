use std::{
    cell::RefCell,
    collections::HashSet,
    ffi::OsStr,
    io::ErrorKind as IOErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    command_runner::{CommandRunner, StreamBinding},
    error::IOCause,
    Error, ErrorKind, Result,
};

// A `CommandRunner` which never spawns anything. Every call is recorded
// for inspection, and every call either succeeds or fails with
// `Error::simulated()` depending on how the mock was built.
#[derive(Debug, Default)]
pub struct MockCommandRunner {
    success: bool,
    executed_commands: RefCell<Vec<String>>,
    executed_command_dir: RefCell<Option<PathBuf>>,
    unenterable_dirs: HashSet<PathBuf>,
}

impl MockCommandRunner {
    // All commands simulate success.
    pub fn success() -> MockCommandRunner {
        MockCommandRunner {
            success: true,
            ..Default::default()
        }
    }

    // All commands simulate failure.
    pub fn failure() -> MockCommandRunner {
        MockCommandRunner {
            success: false,
            ..Default::default()
        }
    }

    // Directory-scoped calls into `dir` fail as if it could not be entered.
    pub fn with_unenterable_dir(mut self, dir: impl Into<PathBuf>) -> MockCommandRunner {
        self.unenterable_dirs.insert(dir.into());
        self
    }

    pub fn executed_commands(&self) -> Vec<String> {
        self.executed_commands.borrow().clone()
    }

    // Only the last directory-scoped call is remembered.
    pub fn executed_command_dir(&self) -> Option<PathBuf> {
        self.executed_command_dir.borrow().clone()
    }

    pub fn any_command_contains(&self, keyword: &str) -> bool {
        self.executed_commands
            .borrow()
            .iter()
            .any(|cmd| cmd.contains(keyword))
    }

    pub fn issued_in_subdirectory_of(&self, parent: &Path) -> bool {
        self.executed_command_dir
            .borrow()
            .as_deref()
            .is_some_and(|dir| dir.starts_with(parent))
    }

    pub fn assert_keyword_included_in_command(&self, keyword: &str) {
        assert!(
            self.any_command_contains(keyword),
            "{:?} should include the keyword {}",
            self.executed_commands.borrow(),
            keyword
        );
    }

    pub fn assert_command_issued_in_subdirectory_of(&self, parent: &Path) {
        assert!(
            self.issued_in_subdirectory_of(parent),
            "Command executed in {:?}, which is not a subdir of {}",
            self.executed_command_dir.borrow(),
            parent.display()
        );
    }
}

impl CommandRunner for MockCommandRunner {
    fn run_bound(&self, _binding: StreamBinding, program: &OsStr, args: &[&OsStr]) -> Result<()> {
        self.executed_commands
            .borrow_mut()
            .push(format!("{} {:?}", program.to_string_lossy(), args));

        if self.success {
            Ok(())
        } else {
            Err(Error::simulated())
        }
    }

    fn run_in_dir_bound(
        &self,
        dir: &Path,
        binding: StreamBinding,
        program: &OsStr,
        args: &[&OsStr],
    ) -> Result<()> {
        if self.unenterable_dirs.contains(dir) {
            return Err(Error::new(ErrorKind::ChangeDir {
                dir: dir.to_path_buf(),
                cause: IOCause::from(IOErrorKind::NotFound),
            }));
        }

        *self.executed_command_dir.borrow_mut() = Some(dir.to_path_buf());
        self.run_bound(binding, program, args)
    }
}
