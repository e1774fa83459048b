//! Replays an action script through a `PuzzleStore` and prints the result.
//!
//! A script holds one action per line in the text form accepted by
//! `Action::from_str`; blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! # pencil a 7 into two cells
//! mode set corner
//! selection set 2,3 4,3
//! digits push 7
//! selection rotate
//! ```
//!
//! # Usage
//!
//! ```sh
//! cargo run --example replay_actions -- script.txt
//! ```
//!
//! Read the script from stdin and use a 16x16 grid:
//!
//! ```sh
//! cargo run --example replay_actions -- --columns 16 --rows 16 < script.txt
//! ```
//!
//! Set `RUST_LOG=debug` to see every dispatched action.

use std::{
    fs,
    io::{self, Read as _},
    path::PathBuf,
    process,
};

use clap::Parser;
use gridmark_state::{Action, GridSize, ModeGroup, PuzzleSettings, PuzzleStore};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Script file to replay. Reads stdin when omitted.
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Number of grid columns.
    #[arg(long, value_name = "COUNT", default_value_t = 9)]
    columns: u16,

    /// Number of grid rows.
    #[arg(long, value_name = "COUNT", default_value_t = 9)]
    rows: u16,

    /// Continue after a line fails to parse or is rejected.
    #[arg(long)]
    keep_going: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let script = match read_script(args.script.as_ref()) {
        Ok(script) => script,
        Err(err) => {
            eprintln!("Failed to read script: {err}");
            process::exit(2);
        }
    };

    let settings = PuzzleSettings {
        grid: GridSize::new(args.columns, args.rows),
        ..PuzzleSettings::default()
    };
    let mut store = PuzzleStore::new(settings);

    let mut failures = 0;
    for (line_no, line) in script.lines().enumerate().map(|(i, line)| (i + 1, line.trim())) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let result = line
            .parse::<Action>()
            .map_err(|err| err.to_string())
            .and_then(|action| store.dispatch(&action).map_err(|err| err.to_string()));
        if let Err(err) = result {
            eprintln!("line {line_no}: {err}");
            failures += 1;
            if !args.keep_going {
                process::exit(1);
            }
        }
    }

    print_state(&store);
    if failures > 0 {
        process::exit(1);
    }
}

fn read_script(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut script = String::new();
            io::stdin().read_to_string(&mut script)?;
            Ok(script)
        }
    }
}

fn print_state(store: &PuzzleStore) {
    let state = store.state();
    println!("Grid: {}", store.settings().grid);
    for group in [ModeGroup::ENTRY, ModeGroup::PEN] {
        match state.mode(group) {
            Some(mode) => println!("Mode ({group}): {mode}"),
            None => println!("Mode ({group}): -"),
        }
    }

    let selection = state.selection();
    let cells = selection
        .keys()
        .map(|key| {
            if Some(key) == selection.primary() {
                format!("*{key}")
            } else {
                key.to_string()
            }
        })
        .collect::<Vec<_>>();
    println!("Selection: [{}]", cells.join(" "));

    println!("Digits:");
    for (key, marks) in state.digits() {
        let marks = marks.iter().map(ToString::to_string).collect::<Vec<_>>();
        println!("  {key}: {}", marks.join(" "));
    }
}
