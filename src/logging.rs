use anyhow::Context;

// Diagnostics go to stderr so they never mix with the program's own stdout
// or with the reporter's output. `RUST_LOG` wins over `verbose`.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .context("failed to initialise the logger")
}
