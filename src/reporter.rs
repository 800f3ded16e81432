use std::{
    cell::Cell,
    error::Error as StdError,
    fmt,
    io::{self, Write},
    num::NonZeroI32,
    process,
};

// Exit status used by `FmtReporter::new`. Nothing downstream gives the
// value meaning beyond "not zero".
pub const DEFAULT_EXIT_CODE: NonZeroI32 = match NonZeroI32::new(1) {
    Some(code) => code,
    None => unreachable!(),
};

// Reports a failed operation. Reporting is fatal: an implementation that
// is given an error does not hand control back to the program.
// It is a trait so tests can inject `MockReporter` instead of exiting.
pub trait Reporter {
    fn report_if_error(&self, err: Option<&dyn StdError>, message: fmt::Arguments<'_>);
}

// Calls `Reporter::report_if_error` with the error of a `Result`, if any,
// and a message built like `format!`.
//
// ```ignore
// report_if_error!(reporter, &result, "Failed to clone {}", url);
// ```
#[macro_export]
macro_rules! report_if_error {
    ($reporter:expr, $result:expr, $($fmt:tt)+) => {
        {
            use $crate::reporter::Reporter as _;
            ($reporter).report_if_error(
                ($result)
                    .as_ref()
                    .err()
                    .map(|err| err as &dyn ::std::error::Error),
                ::std::format_args!($($fmt)+),
            )
        }
    };
}

// Writes the report to stdout and exits the process.
#[derive(Debug, Clone, Copy)]
pub struct FmtReporter {
    exit_code: NonZeroI32,
}

impl FmtReporter {
    pub fn new() -> FmtReporter {
        FmtReporter {
            exit_code: DEFAULT_EXIT_CODE,
        }
    }

    pub fn with_exit_code(exit_code: NonZeroI32) -> FmtReporter {
        FmtReporter { exit_code }
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code.get()
    }

    // The two lines printed before exiting: the message, then the error.
    pub fn write_report(
        out: &mut impl Write,
        err: &dyn StdError,
        message: fmt::Arguments<'_>,
    ) -> io::Result<()> {
        writeln!(out, "{}", message)?;
        writeln!(out, "Error: {}", err)?;
        out.flush()
    }
}

impl Default for FmtReporter {
    fn default() -> Self {
        FmtReporter::new()
    }
}

impl Reporter for FmtReporter {
    fn report_if_error(&self, err: Option<&dyn StdError>, message: fmt::Arguments<'_>) {
        if let Some(err) = err {
            // we are about to exit either way, a broken stdout changes nothing
            let _ = FmtReporter::write_report(&mut io::stdout().lock(), err, message);
            process::exit(self.exit_code());
        }
    }
}

// Records whether the latest call was given an error.
#[derive(Debug, Default)]
pub struct MockReporter {
    reported: Cell<bool>,
}

impl MockReporter {
    pub fn new() -> MockReporter {
        MockReporter::default()
    }

    pub fn reported(&self) -> bool {
        self.reported.get()
    }
}

impl Reporter for MockReporter {
    fn report_if_error(&self, err: Option<&dyn StdError>, _message: fmt::Arguments<'_>) {
        self.reported.set(err.is_some());
    }
}
