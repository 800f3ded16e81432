// Scoped change of the process working directory.
//
// The working directory is shared by every thread in the process, so all
// guards go through one lock. The lock is not re-entrant: do not enter a
// directory while already holding a guard on the same thread.

use std::{
    env,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use crate::{error::IOCause, Error, ErrorKind, Result};

static WORKING_DIR_LOCK: Mutex<()> = Mutex::new(());

// Holds the process inside `dir` until dropped, then moves it back to
// wherever it was when the guard was created.
#[derive(Debug)]
pub struct WorkingDirGuard {
    previous: PathBuf,
    // released after `drop` has restored `previous`
    _lock: MutexGuard<'static, ()>,
}

impl WorkingDirGuard {
    pub fn enter(dir: &Path) -> Result<WorkingDirGuard> {
        // a panic while a guard was alive still restored the directory,
        // so a poisoned lock is safe to reuse
        let lock = WORKING_DIR_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let previous = env::current_dir()
            .map_err(|err| Error::new(ErrorKind::CurrentDir(IOCause::from(&err))))?;

        env::set_current_dir(dir).map_err(|err| {
            Error::new(ErrorKind::ChangeDir {
                dir: dir.to_path_buf(),
                cause: IOCause::from(&err),
            })
        })?;
        log::debug!("Entered directory {}", dir.display());

        Ok(WorkingDirGuard {
            previous,
            _lock: lock,
        })
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        match env::set_current_dir(&self.previous) {
            Ok(()) => log::debug!("Returned to directory {}", self.previous.display()),
            Err(err) => log::warn!(
                "Unable to return to directory {}: {}",
                self.previous.display(),
                err
            ),
        }
    }
}
