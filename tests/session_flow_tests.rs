use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use meritofiszki::libfiszki::{
    api::{FetchError, QuizApi},
    pytanie::{Answer, Question},
    sesja::{FinalScore, Outcome, Phase, QuizSession, SessionError},
    wynik::Verdict,
};

/// Serves a fixed set of questions and counts the requests made.
struct StubQuizApi {
    questions: Vec<Question>,
    calls: AtomicUsize,
}

impl StubQuizApi {
    fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuizApi for StubQuizApi {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.questions.clone())
    }
}

struct FailingQuizApi;

#[async_trait]
impl QuizApi for FailingQuizApi {
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        Err(FetchError::Api {
            status: 503,
            message: "Service Unavailable".to_string(),
        })
    }
}

fn merito_questions() -> Vec<Question> {
    let raw = [
        ("Gdzie znajduje się biblioteka?", 0),
        ("W którym roku powstała uczelnia WSB Merito w Gdańsku?", 0),
        ("Jaki kolor dominuje w logo WSB Merito?", 2),
        ("Ile wydziałów posiada uczelnia WSB Merito?", 2),
        ("Gdzie znajduje się główny kampus WSB Merito w Gdańsku?", 3),
    ];
    raw.iter()
        .enumerate()
        .map(|(q, (content, correct))| {
            let answers = (0..4)
                .map(|a| Answer::new((q * 4 + a) as i64, format!("Option {}", a + 1), a == *correct))
                .collect();
            Question::new(q as i64 + 1, *content, answers)
        })
        .collect()
}

/// Answers every question with `picks[i]` and returns the handoff.
fn play(session: &mut QuizSession, picks: &[usize]) -> FinalScore {
    for pick in picks {
        assert!(matches!(session.submit(Some(*pick)), Ok(Outcome::Graded(_))));
        if let Outcome::Finished(final_score) = session.submit(None).unwrap() {
            return final_score;
        }
    }
    panic!("quiz did not finish");
}

#[tokio::test]
async fn test_full_quiz_four_of_five() {
    let api = StubQuizApi::new(merito_questions());
    let mut session = QuizSession::new();
    session.start(&api).await.unwrap();

    let final_score = play(&mut session, &[0, 0, 2, 1, 3]);

    assert_eq!(final_score, FinalScore { score: 4, total: 5 });
    let summary = final_score.summarize();
    assert_eq!(summary.percentage, 80);
    assert_eq!(summary.verdict, Verdict::Great);
    assert_eq!(summary.score_text, "Correct answers: 4/5");
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn test_three_of_five_is_good_score() {
    let api = StubQuizApi::new(merito_questions());
    let mut session = QuizSession::new();
    session.start(&api).await.unwrap();

    let summary = play(&mut session, &[0, 1, 2, 1, 3]).summarize();

    assert_eq!(summary.percentage, 60);
    assert_eq!(summary.verdict, Verdict::Good);
}

#[tokio::test]
async fn test_progress_follows_position() {
    let api = StubQuizApi::new(merito_questions());
    let mut session = QuizSession::new();
    let first = session.start(&api).await.unwrap();
    assert_eq!(first.progress, 0);

    let mut seen = vec![];
    for _ in 0..4 {
        session.submit(Some(0)).unwrap();
        match session.submit(None).unwrap() {
            Outcome::Presented(presented) => seen.push(presented.progress),
            other => panic!("expected next question, got {:?}", other),
        }
    }

    assert_eq!(seen, vec![20, 40, 60, 80]);
}

#[tokio::test]
async fn test_start_is_single_shot() {
    let api = StubQuizApi::new(merito_questions());
    let mut session = QuizSession::new();
    session.start(&api).await.unwrap();

    let err = session.start(&api).await.unwrap_err();

    assert!(matches!(err, SessionError::AlreadyStarted));
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn test_api_error_is_surfaced_and_halts() {
    let mut session = QuizSession::new();

    let err = session.start(&FailingQuizApi).await.unwrap_err();

    assert_eq!(err.to_string(), "API error: 503: Service Unavailable");
    assert_eq!(session.phase(), Phase::Loading);
    assert!(session.final_score().is_none());
}

#[tokio::test]
async fn test_order_is_preserved() {
    let api = StubQuizApi::new(merito_questions());
    let mut session = QuizSession::new();
    session.start(&api).await.unwrap();

    let mut ids = vec![session.current_question().unwrap().id];
    while let Ok(Outcome::Graded(_)) = session.submit(Some(0)) {
        if let Outcome::Presented(_) = session.submit(None).unwrap() {
            ids.push(session.current_question().unwrap().id);
        }
    }

    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}
