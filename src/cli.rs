use log::info;
use std::env::args;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use wordmask::{Censor, PatternIndex};

pub fn main() -> ExitCode {
    env_logger::init();

    let path = args().nth(1).unwrap_or_else(|| String::from("words.txt"));
    let index = match PatternIndex::load(&path) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("loaded {} forbidden words from {}", index.len(), path);

    print!("Type a sentence: ");
    let _ = io::stdout().flush();

    match censor_line(&index, io::stdin().lock(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Reads one line, which need not be UTF-8, and writes the verdict.
fn censor_line(
    index: &PatternIndex,
    mut input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    let mut line = Vec::new();
    input.read_until(b'\n', &mut line)?;
    while matches!(line.last(), Some(b'\n' | b'\r')) {
        line.pop();
    }

    let (matched, censored) = Censor::new(index).filter_bytes(&line);
    if matched {
        writeln!(output, "Censored: {}", censored)
    } else {
        writeln!(output, "No forbidden words found.")
    }
}
