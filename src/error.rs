use std::{error::Error as StdError, fmt, io::Error as IOError, io::ErrorKind as IOErrorKind, path::PathBuf};

// A type alias for `Result<T, procwrap::Error>`.
pub type Result<T> = anyhow::Result<T, Error>;

// An error that can happen.
#[derive(Debug, PartialEq, Eq)]
pub struct Error(Box<ErrorKind>);

impl Error {
    // A crate private constructor for `Error`.
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    // The fixed error every failing `MockCommandRunner` call returns.
    pub fn simulated() -> Error {
        Error::new(ErrorKind::Simulated)
    }

    // Return the specific type of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    // Unwrap this error into its underlying type.
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }
}

// What the OS said about a failed I/O call. The message keeps the OS text,
// e.g. "No such file or directory (os error 2)".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IOCause {
    pub kind: IOErrorKind,
    pub message: String,
}

impl From<&IOError> for IOCause {
    fn from(err: &IOError) -> IOCause {
        IOCause {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<IOErrorKind> for IOCause {
    fn from(kind: IOErrorKind) -> IOCause {
        IOCause::from(&IOError::from(kind))
    }
}

impl fmt::Display for IOCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for IOCause {}

// The specific type of error that can occur.
#[derive(Debug, PartialEq, Eq)]
pub enum ErrorKind {
    GenericCli(String),
    // the program could not be started at all
    Spawn { program: String, cause: IOCause },
    // the program ran, but did not exit with status zero.
    // `code` is `None` when it was killed by a signal
    NonZeroExit { program: String, code: Option<i32> },
    CurrentDir(IOCause),
    ChangeDir { dir: PathBuf, cause: IOCause },
    Simulated,
}

impl ErrorKind {
    // The OS error behind this one, if there is one.
    pub fn io_cause(&self) -> Option<&IOCause> {
        match self {
            ErrorKind::Spawn { cause, .. }
            | ErrorKind::CurrentDir(cause)
            | ErrorKind::ChangeDir { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.io_cause().map(|cause| cause as &(dyn StdError + 'static))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ErrorKind::GenericCli(msg) => write!(f, "Generic CLI error: {}", msg),
            ErrorKind::Spawn { program, cause } => {
                write!(f, "Unable to start {}: {}", program, cause)
            }
            ErrorKind::NonZeroExit {
                program,
                code: Some(code),
            } => write!(f, "{} exited with status {}", program, code),
            ErrorKind::NonZeroExit {
                program,
                code: None,
            } => write!(f, "{} was terminated by a signal", program),
            ErrorKind::CurrentDir(cause) => {
                write!(f, "Unable to get current directory: {}", cause)
            }
            ErrorKind::ChangeDir { dir, cause } => {
                write!(f, "Unable to chdir to {}: {}", dir.display(), cause)
            }
            ErrorKind::Simulated => write!(f, "Mock error"),
        }
    }
}
