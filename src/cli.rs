use crate::{Choice, Error};
use colored::Colorize;
use log::debug;
use meritofiszki::libfiszki::api::QuizApi;
use meritofiszki::libfiszki::pytanie::Question;
use meritofiszki::libfiszki::sesja::{
    FinalScore, Grade, Outcome, Presented, QuizSession, SessionError, SubmitAction,
};
use meritofiszki::libfiszki::wynik::{Summary, Verdict};
use std::io::{self, Read, Write};
use text_io::try_read;

pub fn prompt(text: &str) -> Result<(), Error> {
    print!("{} ", text.cyan());
    io::stdout().flush()?;
    Ok(())
}

/// One line from stdin without the newline, `None` once stdin is closed.
pub fn read_input() -> Option<String> {
    let mut stdin = io::stdin().lock().bytes().map_while(Result::ok).peekable();
    stdin.peek()?;
    try_read!("{}\n", stdin).ok()
}

/// Runs one quiz. `None` when the quiz could not start or the user quit.
pub async fn cli_loop(api: &dyn QuizApi) -> Result<Option<FinalScore>, Error> {
    let mut session = QuizSession::new();
    println!("{}", "Loading questions...".cyan());

    let presented = match session.start(api).await {
        Ok(presented) => presented,
        Err(SessionError::EmptyResult) => {
            println!("{}", "No questions to display.".yellow());
            return Ok(None);
        }
        Err(err) => {
            println!("{}", format!("Error fetching questions: {}", err).bright_red());
            return Ok(None);
        }
    };
    println!(
        "{}",
        format!(
            "==========> Merito Fiszki ({} questions) <==========",
            presented.total
        )
        .cyan()
    );
    print_question(session.current_question()?, &presented);

    while let Some(action) = session.submit_action() {
        prompt(match action {
            SubmitAction::Confirm => "Answer (1-4, q to quit prematurely):",
            SubmitAction::Next => "Enter for the next question (q to quit):",
            SubmitAction::Finish => "Enter to see your results (q to quit):",
        })?;
        let choice = Choice::from_input(read_input().as_deref());
        debug!("choice: {:?}", choice);

        if choice == Choice::Quit {
            println!("{}", "Quitting Early!".cyan());
            return Ok(None);
        }

        match session.submit(choice.index()) {
            Ok(Outcome::Graded(grade)) => {
                print_grade(session.current_question()?, &grade, session.score())
            }
            Ok(Outcome::Presented(presented)) => {
                print_question(session.current_question()?, &presented)
            }
            Ok(Outcome::Finished(final_score)) => {
                print_results(&final_score.summarize());
                return Ok(Some(final_score));
            }
            Err(err @ (SessionError::NoSelection | SessionError::InvalidSelection(_))) => {
                println!("{}", err.to_string().yellow())
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(session.final_score())
}

fn print_question(question: &Question, presented: &Presented) {
    let leading = format!("{}/{}. ", presented.index + 1, presented.total);
    println!();
    println!(
        "{}",
        format!("Question {} [{:>3}%]", presented.index + 1, presented.progress).bold()
    );
    println!(
        "{}{}",
        leading.cyan(),
        question.content.as_str().black().bold().on_white()
    );
    if presented.malformed {
        println!(
            "{}",
            format!(
                "This question has {} answers instead of 4.",
                question.answers.len()
            )
            .yellow()
        );
    }

    let indent = " ".repeat(leading.len());
    for (i, answer) in question.get_answer_strs().iter().enumerate() {
        println!("{}{}. {}", indent, format!("{}", i + 1).bold(), answer);
    }
}

fn print_grade(question: &Question, grade: &Grade, score: u32) {
    if grade.is_correct {
        println!("{}", format!("Correct! Score: {}", score).bright_green());
    } else {
        println!("{}", format!("Incorrect! Score: {}", score).bright_red());
    }

    let highlight = grade.highlight();
    for (i, answer) in question.get_answer_strs().iter().enumerate() {
        let line = format!("   {}. {}", i + 1, answer);
        if highlight.correct == Some(i) {
            println!("{} {}", line.green().bold(), "✔".green());
        } else if highlight.incorrect == Some(i) {
            println!("{} {}", line.red().strikethrough(), "✘".red());
        } else {
            println!("{}", line.dimmed());
        }
    }
    if highlight.correct.is_none() {
        println!("{}", "No answer is marked as correct for this question.".yellow());
    }
}

fn print_results(summary: &Summary) {
    println!();
    println!("{}", "==========> Results <==========".cyan());
    println!("{}", summary.score_text);
    let percentage = summary.percentage_text();
    let percentage = match summary.verdict {
        Verdict::Perfect | Verdict::Great => percentage.bright_green(),
        Verdict::Good => percentage.yellow(),
        Verdict::TryAgain => percentage.bright_red(),
    };
    println!("{} {}", percentage.bold(), summary.verdict);
}
