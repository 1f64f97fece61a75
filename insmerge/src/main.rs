use clap::Parser;
use insmerge::merge::{Cli, cli};

fn main() -> anyhow::Result<()> {
    // Usage errors exit with 1 rather than clap's default of 2.
    let arguments = Cli::try_parse().unwrap_or_else(|error| {
        error.print().ok();
        std::process::exit(if error.use_stderr() { 1 } else { 0 });
    });

    cli(arguments)
}
