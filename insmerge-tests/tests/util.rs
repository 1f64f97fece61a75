use std::{ffi::OsString, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use insmerge::merge::{Cli, cli};

pub fn test_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_files")
        .join(name)
}

pub fn parse<Argument: Into<OsString>>(
    args: impl IntoIterator<Item = Argument>,
) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(
        std::iter::once(OsString::from("insmerge")).chain(args.into_iter().map(Into::into)),
    )
}

pub fn run<Argument: Into<OsString>>(args: impl IntoIterator<Item = Argument>) -> Result<()> {
    cli(parse(args)?)
}
