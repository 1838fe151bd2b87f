use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crossfill::backtracking_search::{find_fill, FillFailure, FillOptions};
use crossfill::errors::InputError;
use crossfill::grid_config::generate_grid_config_from_structure;
use crossfill::render::render_grid;
use crossfill::word_list::WordList;

/// Fill a crossword grid with words from a word list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grid structure file: '_' marks a fillable cell, anything else is a block
    structure: PathBuf,

    /// Word list file, one word per line
    words: PathBuf,

    /// Also write the filled grid to this file
    output: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Entry point of the crossword filler.
///
/// Delegates to [`try_main`] and turns any error into a message on stderr and a nonzero exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = crossfill::log::init_logger(cli.debug || std::env::var("CROSSFILL_DEBUG").is_ok()) {
        eprintln!("Failed to initialize logger: {e}. Logging will be unavailable.");
    }

    if let Err(e) = try_main(&cli) {
        if let Some(input_err) = e.downcast_ref::<InputError>() {
            eprintln!("Error: {}", input_err.display_detailed());
        } else {
            eprintln!("Error: {e}");
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Load the inputs, search for a fill, and print (and optionally save) the result. Not finding a
/// fill is a normal outcome and still returns `Ok`.
fn try_main(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let word_list = WordList::load_from_path(&cli.words)?;
    let structure = fs::read_to_string(&cli.structure).map_err(|source| InputError::Io {
        path: cli.structure.clone(),
        source,
    })?;
    let config = generate_grid_config_from_structure(word_list, &structure)?;

    log::info!(
        "Filling {} slots from {} words",
        config.slot_count(),
        config.word_list.len()
    );

    let options = FillOptions { timeout: cli.timeout.map(Duration::from_secs) };

    match find_fill(&config, &options) {
        Ok(result) => {
            log::debug!("{:?}", result.statistics);
            let display_grid = render_grid(&config, &result.choices);
            println!("{display_grid}");

            if let Some(output) = &cli.output {
                fs::write(output, format!("{display_grid}\n"))?;
                log::info!("Wrote filled grid to {}", output.display());
            }
        }
        Err(failure) => {
            log::debug!("{:?}", failure.statistics());
            if let FillFailure::Timeout { statistics } = &failure {
                eprintln!("Timed out after {:.1}s", statistics.total_time.as_secs_f64());
            }
            println!("No solution.");
        }
    }

    Ok(())
}
