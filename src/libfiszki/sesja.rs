use crate::libfiszki::api::{FetchError, QuizApi};
use crate::libfiszki::pytanie::{Question, ANSWERS_PER_QUESTION};
use crate::libfiszki::wynik::{percent, summarize, Summary};
use log::{debug, info, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("No questions available.")]
    EmptyResult,
    #[error("Please choose an option.")]
    NoSelection,
    #[error("Option {0} does not exist for this question.")]
    InvalidSelection(usize),
    #[error("Question index {index} out of range ({total} questions).")]
    OutOfRange { index: usize, total: usize },
    #[error("No question is being presented.")]
    NotPresenting,
    #[error("The session has already been started.")]
    AlreadyStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Presenting { index: usize, answered: bool },
    Finished,
}

/// What the next press of the submit button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    Confirm,
    Next,
    Finish,
}

/// A question has just been put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presented {
    pub index: usize,
    pub total: usize,
    pub progress: u8,
    /// Set when the question does not carry exactly four answers.
    pub malformed: bool,
}

/// Which options to paint after grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub correct: Option<usize>,
    pub incorrect: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub selected: usize,
    pub correct_index: Option<usize>,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Graded(Grade),
    Presented(Presented),
    Finished(FinalScore),
}

impl Grade {
    pub fn highlight(&self) -> Highlight {
        Highlight {
            correct: self.correct_index,
            incorrect: if self.is_correct {
                None
            } else {
                Some(self.selected)
            },
        }
    }
}

impl FinalScore {
    pub fn summarize(&self) -> Summary {
        summarize(self.score, self.total)
    }
}

#[derive(Debug, Default)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    answered: bool,
    selected_index: Option<usize>,
    started: bool,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the question set once and presents the first question.
    ///
    /// On any failure the session stays in [`Phase::Loading`] and cannot be
    /// started again.
    pub async fn start(&mut self, api: &dyn QuizApi) -> Result<Presented, SessionError> {
        if self.started {
            warn!("[Session] start called twice, ignoring.");
            return Err(SessionError::AlreadyStarted);
        }
        self.started = true;

        let questions = api.fetch_questions().await?;
        if questions.is_empty() {
            info!("[Session] No questions in the response body.");
            return Err(SessionError::EmptyResult);
        }
        info!("[Session] Questions fetched successfully: {}", questions.len());

        self.questions = questions;
        self.current_index = 0;
        Ok(self.present())
    }

    pub fn phase(&self) -> Phase {
        if self.questions.is_empty() {
            Phase::Loading
        } else if self.current_index < self.questions.len() {
            Phase::Presenting {
                index: self.current_index,
                answered: self.answered,
            }
        } else {
            Phase::Finished
        }
    }

    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.questions
            .get(self.current_index)
            .ok_or(SessionError::OutOfRange {
                index: self.current_index,
                total: self.questions.len(),
            })
    }

    /// Grades the current question on the first call, advances on the second.
    pub fn submit(&mut self, selected_index: Option<usize>) -> Result<Outcome, SessionError> {
        match self.phase() {
            Phase::Presenting { answered: false, .. } => self.grade(selected_index),
            Phase::Presenting { answered: true, .. } => Ok(self.advance()),
            Phase::Loading | Phase::Finished => Err(SessionError::NotPresenting),
        }
    }

    fn grade(&mut self, selected_index: Option<usize>) -> Result<Outcome, SessionError> {
        let selected = selected_index.ok_or(SessionError::NoSelection)?;
        let question = self.current_question()?;
        // Every question offers four slots; an empty slot grades as incorrect.
        if selected >= ANSWERS_PER_QUESTION.max(question.answers.len()) {
            return Err(SessionError::InvalidSelection(selected));
        }
        if question.answer(selected).is_none() {
            debug!(
                "[Session] Option {} of question {} has no answer behind it.",
                selected, question.id
            );
        }

        let correct_index = question.correct_answer_index();
        if correct_index.is_none() {
            warn!(
                "[Session] Question {} has no correct answer marked.",
                question.id
            );
        }
        let is_correct = correct_index == Some(selected);

        self.answered = true;
        self.selected_index = Some(selected);
        if is_correct {
            self.score += 1;
        }
        debug!(
            "[Session] Question {}: picked {} (correct {:?}), score {}",
            self.current_index, selected, correct_index, self.score
        );

        Ok(Outcome::Graded(Grade {
            selected,
            correct_index,
            is_correct,
        }))
    }

    fn advance(&mut self) -> Outcome {
        self.current_index += 1;
        if self.current_index < self.questions.len() {
            Outcome::Presented(self.present())
        } else {
            let final_score = FinalScore {
                score: self.score,
                total: self.questions.len() as u32,
            };
            info!(
                "[Session] Finished with {}/{}",
                final_score.score, final_score.total
            );
            Outcome::Finished(final_score)
        }
    }

    fn present(&mut self) -> Presented {
        self.answered = false;
        self.selected_index = None;

        let question = &self.questions[self.current_index];
        let malformed = !question.is_well_formed();
        if malformed {
            warn!(
                "[Session] Invalid number of answers ({}) for question ID: {}",
                question.answers.len(),
                question.id
            );
        }

        Presented {
            index: self.current_index,
            total: self.questions.len(),
            progress: self.progress(),
            malformed,
        }
    }

    pub fn submit_action(&self) -> Option<SubmitAction> {
        match self.phase() {
            Phase::Presenting { answered: false, .. } => Some(SubmitAction::Confirm),
            Phase::Presenting { index, answered: true } if index + 1 == self.questions.len() => {
                Some(SubmitAction::Finish)
            }
            Phase::Presenting { answered: true, .. } => Some(SubmitAction::Next),
            Phase::Loading | Phase::Finished => None,
        }
    }

    pub fn progress(&self) -> u8 {
        percent(self.current_index, self.questions.len())
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selection_enabled(&self) -> bool {
        matches!(self.phase(), Phase::Presenting { answered: false, .. })
    }

    pub fn final_score(&self) -> Option<FinalScore> {
        match self.phase() {
            Phase::Finished => Some(FinalScore {
                score: self.score,
                total: self.questions.len() as u32,
            }),
            _ => None,
        }
    }
}
