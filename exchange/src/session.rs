//! In-memory progress and score of one quiz.

use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::grading::Verdict;
use crate::question::Question;

/// Largest quiz that can be started.
pub const MAX_QUIZ_QUESTIONS: usize = 30;

/// Quiz length when none is requested.
pub const DEFAULT_QUESTION_COUNT: usize = 3;

/// Inactivity after which a quiz is abandoned.
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(300);

/// Errors starting a quiz.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    /// Requested length is outside `1..=MAX_QUIZ_QUESTIONS`.
    #[error("Number of questions must be between 1 and {max}, got {requested}")]
    InvalidCount {
        /// What was asked for.
        requested: usize,
        /// The upper bound.
        max: usize,
    },
}

/// Checks a requested quiz length.
///
/// # Errors
///
/// Returns `QuizError::InvalidCount` for 0 or more than [`MAX_QUIZ_QUESTIONS`].
pub const fn check_question_count(requested: usize) -> Result<usize, QuizError> {
    if requested == 0 || requested > MAX_QUIZ_QUESTIONS {
        Err(QuizError::InvalidCount {
            requested,
            max: MAX_QUIZ_QUESTIONS,
        })
    } else {
        Ok(requested)
    }
}

/// One learner's pass through a fixed list of questions.
#[derive(Debug)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: Option<usize>,
    asked: usize,
    correct: usize,
    incorrect: usize,
    started_at: Instant,
    last_activity: Instant,
}

impl QuizSession {
    /// Starts a quiz over `questions`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidCount` when the list is empty or longer
    /// than [`MAX_QUIZ_QUESTIONS`].
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        check_question_count(questions.len())?;
        let now = Instant::now();
        Ok(Self {
            questions,
            current: None,
            asked: 0,
            correct: 0,
            incorrect: 0,
            started_at: now,
            last_activity: now,
        })
    }

    /// Presents the next unanswered question.
    ///
    /// Returns the question already awaiting an answer if there is one, and
    /// `None` once every question has been answered.
    pub fn next_question(&mut self) -> Option<&Question> {
        if self.current.is_none() && !self.is_complete() {
            self.current = Some(self.asked);
        }
        self.last_activity = Instant::now();
        self.current.and_then(|i| self.questions.get(i))
    }

    /// Records the verdict for the current question.
    ///
    /// Returns `false` (and changes nothing) when no question is awaiting an answer.
    pub fn record(&mut self, verdict: &Verdict) -> bool {
        if self.current.take().is_none() {
            return false;
        }
        self.asked += 1;
        if verdict.correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.last_activity = Instant::now();
        true
    }

    /// Whether every question has been answered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.asked >= self.questions.len()
    }

    /// When the quiz is abandoned if nothing else happens, given an
    /// inactivity `timeout`.
    #[must_use]
    pub fn idle_deadline(&self, timeout: Duration) -> Instant {
        self.last_activity + timeout
    }

    /// Number of questions in the quiz.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false`; a session cannot be built without questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions answered so far.
    #[must_use]
    pub const fn asked(&self) -> usize {
        self.asked
    }

    /// Correct answers so far.
    #[must_use]
    pub const fn correct(&self) -> usize {
        self.correct
    }

    /// Incorrect answers so far.
    #[must_use]
    pub const fn incorrect(&self) -> usize {
        self.incorrect
    }

    /// Time since the quiz started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Final score line.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "You answered {} out of {} questions correctly.",
            self.correct, self.asked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::ChoiceLabel;

    fn question(n: usize) -> Question {
        Question::MultipleChoice {
            prompt: format!("Question {n}"),
            choices: ["1".into(), "2".into(), "3".into(), "4".into()],
            correct_choice: ChoiceLabel::A,
            explanation: "One.".to_string(),
        }
    }

    fn verdict(correct: bool) -> Verdict {
        Verdict {
            correct,
            feedback: String::new(),
        }
    }

    #[test]
    fn test_counts_are_bounded() {
        assert!(QuizSession::new(Vec::new()).is_err());
        assert_eq!(
            check_question_count(31),
            Err(QuizError::InvalidCount {
                requested: 31,
                max: 30
            })
        );
        assert_eq!(check_question_count(DEFAULT_QUESTION_COUNT), Ok(3));
    }

    #[test]
    fn test_walks_questions_in_order_and_scores() {
        let mut session = QuizSession::new((1..=3).map(question).collect()).unwrap();

        assert_eq!(session.next_question().unwrap().prompt(), "Question 1");
        // Asking again does not skip the pending question.
        assert_eq!(session.next_question().unwrap().prompt(), "Question 1");
        assert!(session.record(&verdict(true)));
        assert!(!session.record(&verdict(true)));

        assert_eq!(session.next_question().unwrap().prompt(), "Question 2");
        session.record(&verdict(false));
        assert_eq!(session.next_question().unwrap().prompt(), "Question 3");
        session.record(&verdict(true));

        assert!(session.is_complete());
        assert!(session.next_question().is_none());
        assert_eq!((session.correct(), session.incorrect(), session.asked()), (2, 1, 3));
        assert_eq!(session.summary(), "You answered 2 out of 3 questions correctly.");
    }

    #[test]
    fn test_summary_after_early_stop_counts_only_answered() {
        let mut session = QuizSession::new((1..=5).map(question).collect()).unwrap();
        session.next_question();
        session.record(&verdict(false));
        session.next_question();

        assert!(!session.is_complete());
        assert_eq!(session.summary(), "You answered 0 out of 1 questions correctly.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_deadline_moves_with_activity() {
        let mut session = QuizSession::new(vec![question(1), question(2)]).unwrap();
        session.next_question();
        let first = session.idle_deadline(SESSION_TIMEOUT);
        assert_eq!(first, Instant::now() + SESSION_TIMEOUT);

        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(session.idle_deadline(SESSION_TIMEOUT), first);

        session.record(&verdict(true));
        assert_eq!(
            session.idle_deadline(SESSION_TIMEOUT),
            first + Duration::from_secs(120)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_question_expires_at_the_deadline() {
        let mut session = QuizSession::new(vec![question(1)]).unwrap();
        session.next_question();
        let deadline = session.idle_deadline(SESSION_TIMEOUT);

        let read = tokio::time::timeout_at(deadline, std::future::pending::<()>()).await;
        assert!(read.is_err());
        assert_eq!(Instant::now(), deadline);
    }
}
