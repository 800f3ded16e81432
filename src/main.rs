use anyhow::Context;
use procwrap::{execute, logging, parse_args, report_if_error, FmtReporter, RealCommandRunner};

fn main() -> anyhow::Result<()> {
    let args = parse_args().context("failed to parse the command line")?;
    logging::init(args.verbose)?;

    let reporter = FmtReporter::with_exit_code(args.exit_code);
    let result = execute(&args, &RealCommandRunner);
    report_if_error!(
        reporter,
        &result,
        "Failed to run {}",
        args.program.to_string_lossy()
    );

    Ok(())
}
