//! Interactive query loop
//!
//! Reads one query per line from standard input. A line starting with `:k`
//! runs keyword extraction on the rest of the line instead of a search. An
//! empty line or end of input stops the loop.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use tfidf::Engine;

/// Prefix selecting keyword extraction
const KEYWORD_PREFIX: &str = ":k";

/// Command parsed from one input line
#[derive(Debug, PartialEq)]
enum Command<'a> {
    Search(&'a str),
    Keywords(&'a str),
    Quit,
}

fn parse_line(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Command::Quit;
    }
    match line.strip_prefix(KEYWORD_PREFIX) {
        Some(rest) => Command::Keywords(rest.trim()),
        None => Command::Search(line),
    }
}

/// Run the loop until the user stops it
pub fn run(mut engine: Engine) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\nQ? ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            break;
        };

        match parse_line(&line) {
            Command::Quit => break,
            Command::Keywords(text) => {
                super::print_keywords(&engine.determine_keywords(text)?);
            }
            Command::Search(query) => {
                let results = engine.search(query)?;
                println!();
                super::print_search_results(&results, super::DEFAULT_RESULT_LIMIT);
            }
        }
    }

    Ok(())
}
