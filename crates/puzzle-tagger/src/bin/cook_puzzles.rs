//! Tag a Lichess puzzle CSV with tactical motifs.
//!
//! Reads `PuzzleId,FEN,Moves,...` rows from a file (or stdin) and writes one
//! JSON object per puzzle to stdout: `{"id": "...", "tags": [...]}`.
//!
//! Usage:
//!   cargo run -p puzzle-tagger --bin cook-puzzles -- lichess_db_puzzle.csv
//!
//! Settings come from the environment or a .env file, see `TaggerConfig`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use anyhow::{bail, Context};
use tracing::{info, warn};

use puzzle_tagger::puzzle::extraction::PuzzleRecord;
use puzzle_tagger::{cook_traced, CookedPuzzle, TaggerConfig};

/// Input path from CLI args, none means stdin
fn parse_input_path() -> anyhow::Result<Option<String>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => Ok(None),
        [flag] if flag == "-h" || flag == "--help" => {
            eprintln!("Usage: cook-puzzles [CSV_PATH]");
            std::process::exit(0);
        }
        [path] if path == "-" => Ok(None),
        [path] => Ok(Some(path.clone())),
        _ => bail!("Usage: cook-puzzles [CSV_PATH]"),
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let config = TaggerConfig::load().context("Failed to load tagger configuration")?;
    let input_path = parse_input_path()?;

    let reader: Box<dyn BufRead> = match &input_path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin().lock())),
    };

    info!(
        input = input_path.as_deref().unwrap_or("<stdin>"),
        skip_invalid = config.skip_invalid,
        "Cooking puzzles"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut cooked = 0u64;
    let mut skipped = 0u64;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let record = match PuzzleRecord::parse_csv_line(&line) {
            Some(r) => r,
            None => continue,
        };

        let result = record
            .to_puzzle()
            .and_then(|puzzle| cook_traced(&puzzle, &config.puzzle_url_base));

        let tags = match result {
            Ok(tags) => tags,
            Err(e) if config.skip_invalid => {
                warn!(puzzle_id = %record.id, error = %e, "Skipping puzzle");
                skipped += 1;
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Puzzle {} on line {}", record.id, line_no + 1));
            }
        };

        let output = CookedPuzzle { id: record.id, tags };
        serde_json::to_writer(&mut out, &output).context("Failed to write JSON")?;
        out.write_all(b"\n").context("Failed to write output")?;

        cooked += 1;
        if config.progress_every > 0 && cooked % config.progress_every == 0 {
            info!(cooked, skipped, "Progress");
        }
    }

    out.flush().context("Failed to flush output")?;
    info!(cooked, skipped, "Done");
    Ok(())
}
