use serde::{Deserialize, Serialize};

/// Number of answers every question is expected to carry.
pub const ANSWERS_PER_QUESTION: usize = 4;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Answer {
    #[serde(rename = "answer_id")]
    pub id: i64,
    pub content: String,
    pub is_correct: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Question {
    #[serde(rename = "question_id")]
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub category: Option<i64>,
    /// Display order. Never reordered after decoding.
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Answer {
    pub fn new(id: i64, content: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            content: content.into(),
            is_correct,
        }
    }
}

impl Question {
    pub fn new(id: i64, content: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            id,
            content: content.into(),
            category: None,
            answers,
        }
    }

    /// Index of the first answer flagged as correct, `None` if no answer is.
    pub fn correct_answer_index(&self) -> Option<usize> {
        self.answers.iter().position(|answer| answer.is_correct)
    }

    pub fn is_well_formed(&self) -> bool {
        self.answers.len() == ANSWERS_PER_QUESTION
    }

    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index)
    }

    pub fn get_answer_strs(&self) -> Vec<&str> {
        self.answers.iter().map(|a| a.content.as_str()).collect()
    }
}
