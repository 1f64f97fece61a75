use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow, ensure};
use clap::Parser;
use lib_insmerge::{
    DEFAULT_GAP_CHARACTER,
    configuration::{MergeConfiguration, OutputMode},
    output::{MatrixFormatter, OutputFormatter, TaggedFormatter, auxiliary_output_path},
    pipeline::{MergeStatistics, PreparedMerge},
    placeholder::write_placeholder,
};
use log::{LevelFilter, debug, info, warn};
use simplelog::{ColorChoice, TermLogger, TerminalMode};


/// How often a placeholder post-alignment file is written before giving up on opening it.
pub const MAX_PLACEHOLDER_ATTEMPTS: usize = 2;

/// Merge the insertions reported in an alignment map into the aligned sequences.
#[derive(Parser)]
#[command(version)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// The fasta file of the unaligned sequences.
    pre_alignment: PathBuf,

    /// The map file that reports where residues of the unaligned sequences were left out of the alignment.
    map: PathBuf,

    /// The fasta file of the aligned sequences.
    ///
    /// In trimmed mode, a placeholder with empty records is written to this path if it cannot be opened.
    post_alignment: PathBuf,

    /// The output file.
    ///
    /// This is a CSV matrix, or in trimmed mode a fasta file of the merged heads.
    /// In trimmed mode, the tails are written next to it, replacing a `.fa` extension by `_jSeqs.fa`.
    output: PathBuf,

    /// Pass `j` to select trimmed mode.
    ///
    /// Then only the insertion at point zero is merged, and the residues after it are written separately.
    #[clap(value_parser = parse_output_mode)]
    mode: Option<OutputMode>,

    /// The character used to pad insertions and to fill insertion points a sequence has no residues for.
    #[clap(long, default_value_t = DEFAULT_GAP_CHARACTER)]
    gap_character: char,
}

fn parse_output_mode(mode: &str) -> std::result::Result<OutputMode, String> {
    if mode.starts_with(['j', 'J']) {
        Ok(OutputMode::Trimmed)
    } else {
        Err(format!("unknown mode '{mode}', use 'j' for trimmed mode"))
    }
}

pub fn cli(cli: Cli) -> Result<()> {
    if TermLogger::init(
        cli.log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        debug!("Logger was already initialised");
    }

    let configuration = MergeConfiguration {
        mode: cli.mode.unwrap_or_default(),
        gap_character: cli.gap_character,
    };

    let pre_alignment = open_input(&cli.pre_alignment, "pre-alignment")?;
    let map = open_input(&cli.map, "map")?;
    let post_alignment = if configuration.is_trimmed() {
        open_post_alignment_or_placeholder(&cli.post_alignment, &cli.map)?
    } else {
        open_input(&cli.post_alignment, "post-alignment")?
    };

    let prepared = PreparedMerge::prepare(pre_alignment, map, configuration.clone())?;

    let statistics = match configuration.mode {
        OutputMode::Matrix => {
            let output = create_output(&cli.output)?;
            stream_into(
                prepared,
                post_alignment,
                MatrixFormatter::new(output),
                &[cli.output.clone()],
            )?
        }
        OutputMode::Trimmed => {
            let auxiliary_path = auxiliary_output_path(&cli.output).path;
            let output = create_output(&cli.output)?;
            let auxiliary = create_output(&auxiliary_path)?;
            stream_into(
                prepared,
                post_alignment,
                TaggedFormatter::new(output, auxiliary),
                &[cli.output.clone(), auxiliary_path],
            )?
        }
    };

    info!(
        "Wrote {} sequences to {:?}",
        statistics.sequences, cli.output
    );
    Ok(())
}

fn open_input(path: &Path, kind: &str) -> Result<BufReader<File>> {
    debug!("Opening {kind} file {path:?}");
    File::open(path)
        .map(BufReader::new)
        .map_err(|error| anyhow!("Unable to open {kind} file {path:?}: {error}"))
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    debug!("Creating output file {path:?}");
    File::create(path)
        .map(BufWriter::new)
        .map_err(|error| anyhow!("Unable to create output file {path:?}: {error}"))
}

/// Opens the post-alignment file, writing a placeholder derived from the map if it cannot be opened.
fn open_post_alignment_or_placeholder(path: &Path, map: &Path) -> Result<BufReader<File>> {
    open_with_placeholder(
        path,
        || File::open(path).map(BufReader::new),
        || {
            let placeholder = File::create(path).map_err(|error| {
                anyhow!("Unable to create placeholder post-alignment file {path:?}: {error}")
            })?;
            let count = write_placeholder(open_input(map, "map")?, BufWriter::new(placeholder))?;
            info!("Wrote placeholder with {count} records to {path:?}");
            Ok(())
        },
    )
}

/// Calls `open` until it succeeds, calling `write` after each failure.
///
/// Fails once `open` failed [`MAX_PLACEHOLDER_ATTEMPTS`] times after a placeholder was written.
fn open_with_placeholder<Opened>(
    path: &Path,
    mut open: impl FnMut() -> io::Result<Opened>,
    mut write: impl FnMut() -> Result<()>,
) -> Result<Opened> {
    let mut attempts = 0;

    loop {
        match open() {
            Ok(opened) => return Ok(opened),
            Err(error) => {
                ensure!(
                    attempts < MAX_PLACEHOLDER_ATTEMPTS,
                    "Unable to open post-alignment file {path:?} after writing a placeholder {attempts} times: {error}"
                );
                warn!(
                    "Unable to open post-alignment file {path:?}: {error}. Writing a placeholder with an empty record per sequence of the map."
                );

                write()?;
                attempts += 1;
            }
        }
    }
}

/// Streams the post-alignment sequences into the formatter.
///
/// If this fails, the output files are removed.
fn stream_into(
    prepared: PreparedMerge,
    post_alignment: BufReader<File>,
    mut formatter: impl OutputFormatter,
    outputs: &[PathBuf],
) -> Result<MergeStatistics> {
    let result = prepared.stream(post_alignment, &mut formatter);
    drop(formatter);

    result.map_err(|error| {
        for output in outputs {
            if let Err(removal_error) = fs::remove_file(output) {
                warn!("Unable to remove incomplete output file {output:?}: {removal_error}");
            }
        }
        error.into()
    })
}
