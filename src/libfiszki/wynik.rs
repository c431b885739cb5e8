use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Perfect,
    Great,
    Good,
    TryAgain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub score_text: String,
    pub percentage: u8,
    pub verdict: Verdict,
}

impl Verdict {
    pub fn from_percentage(percentage: u8) -> Verdict {
        match percentage {
            100.. => Verdict::Perfect,
            80..=99 => Verdict::Great,
            60..=79 => Verdict::Good,
            _ => Verdict::TryAgain,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Perfect => "Perfect score! 🎉",
            Verdict::Great => "Great job! 👏",
            Verdict::Good => "Good score! 👍",
            Verdict::TryAgain => "Try again! 💪",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Summary {
    pub fn percentage_text(&self) -> String {
        format!("{}%", self.percentage)
    }
}

/// `round(100 * part / whole)`, 0 for an empty whole, never above 100.
pub fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let ratio = (100.0 * part as f64 / whole as f64).round();
    ratio.min(100.0) as u8
}

pub fn summarize(score: u32, total: u32) -> Summary {
    let percentage = percent(score as usize, total as usize);
    Summary {
        score_text: format!("Correct answers: {}/{}", score, total),
        percentage,
        verdict: Verdict::from_percentage(percentage),
    }
}
