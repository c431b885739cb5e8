use colored::Colorize;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;

use clap::Parser;
use meritofiszki::libfiszki::api::{HttpQuizApi, QuizApi};
use meritofiszki::libfiszki::pytanie::Question;

#[derive(Parser, Debug)]
#[command(name = "Pobieracz")]
#[command(version, about = "Saves the Merito Fiszki question set to a JSON file", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "info")]
    log_level: String,
    #[arg(
        short,
        long,
        env = "MERITOFISZKI_API_URL",
        default_value = "http://localhost:8000/"
    )]
    base_url: String,
    /// Leave out questions that do not have exactly four answers
    #[arg(short, long, default_value = "false")]
    skip_malformed: bool,

    json: Option<PathBuf>,
}

fn validate_question(question: &Question) -> bool {
    question.is_well_formed() && question.correct_answer_index().is_some()
}

/// Keeps every question unless `skip_malformed` is set, logging each one.
fn select_questions(questions: Vec<Question>, skip_malformed: bool) -> Vec<Question> {
    questions
        .into_iter()
        .filter(|question| {
            if validate_question(question) {
                info!(
                    "{}",
                    format!("├ Question {}: {}", question.id, question.content).green()
                );
                return true;
            }
            error!(
                "{}",
                format!(
                    "├ ✘ Question {}: {} ({} answers, correct: {:?})",
                    question.id,
                    question.content,
                    question.answers.len(),
                    question.correct_answer_index()
                )
                .red()
                .strikethrough()
            );
            !skip_malformed
        })
        .collect()
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let json_file = match args.json {
        Some(f) => f,
        None => {
            error!("{}", "Output file not specified!".red());
            std::process::exit(1);
        }
    };
    let api = match HttpQuizApi::new(&args.base_url) {
        Ok(api) => api,
        Err(e) => {
            error!("{}{}", "Unable to use API: ".red(), e);
            std::process::exit(1);
        }
    };
    info!(
        "{}",
        format!("Endpoint at {} and file at {:?}", api.endpoint(), json_file).cyan()
    );

    let questions = match api.fetch_questions().await {
        Ok(q) => q,
        Err(e) => {
            error!("{}", format!("Error fetching questions: {}!", e).red());
            std::process::exit(1);
        }
    };
    info!(
        "{}",
        format!("Saving data... ({} Questions)", questions.len()).blue()
    );

    let questions = select_questions(questions, args.skip_malformed);
    let json = match serde_json::to_string_pretty(&questions) {
        Ok(j) => j,
        Err(e) => {
            error!("{}", format!("Cannot encode questions: {}!", e).red());
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::write(&json_file, json) {
        error!("{}", format!("Cannot write {:?}: {}!", json_file, e).red());
        std::process::exit(1);
    }
    info!(
        "{}",
        format!("Saved {} questions to {:?}", questions.len(), json_file).cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use meritofiszki::libfiszki::pytanie::Answer;

    fn question(id: i64, answers: usize, correct: Option<usize>) -> Question {
        let answers = (0..answers)
            .map(|i| Answer::new(i as i64, format!("{}", i), Some(i) == correct))
            .collect();
        Question::new(id, "?", answers)
    }

    #[test]
    fn test_validate_question() {
        assert!(validate_question(&question(1, 4, Some(2))));
        assert!(!validate_question(&question(2, 3, Some(0))));
        assert!(!validate_question(&question(3, 4, None)));
    }

    #[test]
    fn test_select_questions_keeps_everything_by_default() {
        let questions = vec![question(1, 4, Some(0)), question(2, 2, Some(0))];
        assert_eq!(select_questions(questions.clone(), false), questions);
    }

    #[test]
    fn test_select_questions_skips_malformed() {
        let questions = vec![
            question(1, 4, Some(0)),
            question(2, 2, Some(0)),
            question(3, 4, Some(3)),
        ];
        let kept: Vec<i64> = select_questions(questions, true)
            .iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(kept, vec![1, 3]);
    }
}
