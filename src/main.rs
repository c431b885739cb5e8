use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::debug;
use meritofiszki::libfiszki::api::{FetchError, FileQuizApi, HttpQuizApi, QuizApi};
use meritofiszki::libfiszki::sesja::SessionError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

mod cli;

#[derive(Debug, PartialEq)]
enum Choice {
    Option(usize),
    Nothing,
    Quit,
}

#[derive(Parser, Debug)]
#[command(name = "Merito Fiszki")]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(
        short,
        long,
        env = "MERITOFISZKI_API_URL",
        default_value = "http://localhost:8000/"
    )]
    base_url: String,
    /// Replay a question set saved by `pobieracz` instead of calling the API
    #[arg(short, long, value_name = "FILE")]
    from: Option<PathBuf>,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

impl Choice {
    fn from_str(input: &str) -> Choice {
        match input.trim() {
            "q" | "Q" => Choice::Quit,
            input => match input.parse::<usize>() {
                Ok(num) if num > 0 => Choice::Option(num - 1),
                _ => Choice::Nothing,
            },
        }
    }

    /// A closed stdin reads as quitting.
    fn from_input(input: Option<&str>) -> Choice {
        input.map_or(Choice::Quit, Choice::from_str)
    }

    fn index(&self) -> Option<usize> {
        match self {
            Choice::Option(num) => Some(*num),
            Choice::Nothing | Choice::Quit => None,
        }
    }
}

#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Cannot write to the terminal")]
    Terminal(#[from] io::Error),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let api: Box<dyn QuizApi> = match args.from {
        Some(path) => {
            debug!("[Setup] Reading questions from {:?}", path);
            Box::new(FileQuizApi::new(path))
        }
        None => {
            let api = HttpQuizApi::new(&args.base_url)?;
            debug!("[Setup] Using endpoint {}", api.endpoint());
            Box::new(api)
        }
    };

    loop {
        if cli::cli_loop(api.as_ref()).await?.is_none() {
            break;
        }
        cli::prompt("Play again? (y/N):")?;
        let again = cli::read_input().unwrap_or_default();
        if !matches!(again.trim(), "y" | "Y") {
            break;
        }
    }

    Ok(())
}
