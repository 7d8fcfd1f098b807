use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use chord_namer::{Chord, ChordNamer};
use clap::Parser;
use log::{debug, error};

/// Name chords from note names, simplest name first.
#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// Notes to name, bass first, e.g. `C E G` or `C,E,G`. Reads lines from stdin when omitted.
    #[clap(value_parser)]
    notes: Vec<String>,

    /// Print every note's interval from each candidate root
    #[clap(long, action)]
    intervals: bool,

    /// Don't try hiding the bass note when naming slash chords
    #[clap(long, action)]
    no_rootless: bool,
}

fn main() -> ExitCode {
    let default_log_level = "warn";
    let env = env_logger::Env::default().filter_or("RUST_LOG", default_log_level);
    env_logger::init_from_env(env);

    let cli = Cli::parse();
    let namer = ChordNamer::builder().rootless(!cli.no_rootless).build();

    if cli.notes.is_empty() {
        return match run_interactive(&namer, cli.intervals) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("failed to read stdin: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let line = cli.notes.join(" ");
    match namer.name(&line) {
        Ok(chord) => {
            print_chord(&chord, cli.intervals);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("could not name `{line}`: {e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_interactive(namer: &ChordNamer, intervals: bool) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("Enter notes separated by spaces or commas:");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };
        debug!("read `{line}`");
        println!("Entered notes: {line}");

        match namer.name(&line) {
            Ok(chord) => print_chord(&chord, intervals),
            Err(e) => {
                error!("could not name `{line}`: {e}");
                println!("\n{e}");
            }
        }
        println!();
    }
}

fn print_chord(chord: &Chord, intervals: bool) {
    for candidate in chord.candidates() {
        if intervals {
            let voicing = chord.interval().voicing_from(candidate.root);
            let notes: Vec<String> = voicing.iter().map(ToString::to_string).collect();
            println!("{}", notes.join("\t"));
            println!("{}", chord.interval().named_intervals_from(candidate.root).join("\t"));
        }
        println!("Chord: {}", candidate.name);
    }
}
