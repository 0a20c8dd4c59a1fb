//! Quiz sessions: question snapshot, answer selection, scoring and results
//!
//! A session moves `InProgress -> Completed` only through [`QuizSession::advance`]
//! on the last question. Every call made out of order fails with
//! `InvalidStateTransition` and leaves the session untouched.
//!
//! `score` counts a submitted answer before `advance` moves past it, so the
//! bound is `score <= current_index + submitted` and `score <= len`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ContentCatalog;
use crate::content::QuizQuestion;
use crate::errors::{AwarenessError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    InProgress,
    Completed,
}

/// Qualitative result bucket, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Low,
    Medium,
    High,
    Perfect,
}

impl ScoreTier {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            p if p >= 100 => ScoreTier::Perfect,
            p if p >= 80 => ScoreTier::High,
            p if p >= 60 => ScoreTier::Medium,
            _ => ScoreTier::Low,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreTier::Perfect => "Perfect! You're a cybersecurity expert!",
            ScoreTier::High => "Great job! You're well-prepared for cyber threats!",
            ScoreTier::Medium => "Good work! Keep learning to stay safer online",
            ScoreTier::Low => "Keep practicing! Cybersecurity awareness is crucial",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizReport {
    pub cohort: String,
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub tier: ScoreTier,
}

impl QuizReport {
    pub fn new(cohort: impl Into<String>, score: u32, total: u32) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (f64::from(score) * 100.0 / f64::from(total)).round() as u32
        };
        Self {
            cohort: cohort.into(),
            score,
            total,
            percentage,
            tier: ScoreTier::from_percentage(percentage),
        }
    }
}

/// One quiz attempt. Owned exclusively by the flow driving it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSession {
    id: Uuid,
    cohort: String,
    questions: Vec<QuizQuestion>,
    current_index: usize,
    selected_answer: Option<usize>,
    submitted: bool,
    last_answer_correct: Option<bool>,
    score: u32,
    completed: bool,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    fn new(cohort: &str, questions: Vec<QuizQuestion>) -> Self {
        Self {
            id: Uuid::new_v4(),
            cohort: cohort.to_string(),
            questions,
            current_index: 0,
            selected_answer: None,
            submitted: false,
            last_answer_correct: None,
            score: 0,
            completed: false,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Choose an option for the current question
    pub fn select_answer(&mut self, option_index: usize) -> Result<()> {
        const OP: &str = "select an answer";
        let question = self.active_question(OP)?;
        if self.submitted {
            return Err(AwarenessError::invalid_transition(OP, "answer already submitted"));
        }
        if self.selected_answer.is_some() {
            return Err(AwarenessError::invalid_transition(OP, "question already answered"));
        }
        if option_index >= question.options.len() {
            return Err(AwarenessError::invalid_transition(
                OP,
                format!(
                    "option {} out of range for {} options",
                    option_index,
                    question.options.len()
                ),
            ));
        }

        self.selected_answer = Some(option_index);
        Ok(())
    }

    /// Score the selected answer and unlock `advance`. Returns whether it was correct.
    pub fn submit_answer(&mut self) -> Result<bool> {
        const OP: &str = "submit an answer";
        let question = self.active_question(OP)?;
        if self.submitted {
            return Err(AwarenessError::invalid_transition(OP, "answer already submitted"));
        }
        let selected = self
            .selected_answer
            .ok_or_else(|| AwarenessError::invalid_transition(OP, "no answer selected"))?;

        let question_id = question.id;
        let correct = question.is_correct(selected);
        if correct {
            self.score += 1;
        }
        self.submitted = true;
        self.last_answer_correct = Some(correct);
        tracing::debug!(
            session = %self.id,
            question = question_id,
            correct,
            score = self.score,
            "answer submitted"
        );
        Ok(correct)
    }

    /// Move to the next question, or complete the quiz after the last one
    pub fn advance(&mut self) -> Result<QuizState> {
        const OP: &str = "advance";
        self.active_question(OP)?;
        if !self.submitted {
            return Err(AwarenessError::invalid_transition(OP, "answer not submitted"));
        }

        self.selected_answer = None;
        self.submitted = false;
        self.last_answer_correct = None;

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
        } else {
            self.current_index = self.questions.len();
            self.completed = true;
            self.completed_at = Some(Utc::now());
            tracing::info!(
                session = %self.id,
                cohort = %self.cohort,
                score = self.score,
                total = self.questions.len(),
                "quiz completed"
            );
        }
        Ok(self.state())
    }

    fn active_question(&self, operation: &'static str) -> Result<&QuizQuestion> {
        self.current_question()
            .ok_or_else(|| AwarenessError::invalid_transition(operation, "quiz already completed"))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cohort(&self) -> &str {
        &self.cohort
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// `None` once the quiz is completed
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.completed {
            return None;
        }
        self.questions.get(self.current_index)
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.selected_answer
    }

    /// True between `submit_answer` and `advance`, while the explanation is shown
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn last_answer_correct(&self) -> Option<bool> {
        self.last_answer_correct
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> QuizState {
        if self.completed {
            QuizState::Completed
        } else {
            QuizState::InProgress
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Fraction of questions already left behind, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.current_index as f64 / self.questions.len() as f64
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Final result; only available once completed
    pub fn report(&self) -> Option<QuizReport> {
        if !self.completed {
            return None;
        }
        Some(QuizReport::new(
            self.cohort.clone(),
            self.score,
            self.questions.len() as u32,
        ))
    }
}

/// Starts sessions from a cohort's question sequence
#[derive(Debug, Clone)]
pub struct QuizEngine {
    catalog: Arc<ContentCatalog<QuizQuestion>>,
}

impl QuizEngine {
    pub fn new(catalog: Arc<ContentCatalog<QuizQuestion>>) -> Self {
        Self { catalog }
    }

    /// Fresh session at question 0; unknown or empty cohorts get `student` questions
    pub fn start_session(&self, cohort: &str) -> QuizSession {
        let questions = self.catalog.entries_for(cohort).to_vec();
        let session = QuizSession::new(cohort, questions);
        tracing::debug!(session = %session.id, cohort, questions = session.len(), "quiz started");
        session
    }

    /// Same as starting again with the session's cohort; allowed in any state
    pub fn restart(&self, session: &QuizSession) -> QuizSession {
        self.start_session(&session.cohort)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::content;
    use crate::Cohort;

    fn question(id: u32, correct_index: usize) -> QuizQuestion {
        QuizQuestion {
            id,
            question: format!("Question {}", id),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index,
            explanation: "because".to_string(),
            tip: "stay alert".to_string(),
        }
    }

    fn two_question_engine() -> QuizEngine {
        let catalog =
            ContentCatalog::from_pairs(vec![(Cohort::Student, vec![question(1, 1), question(2, 0)])])
                .unwrap();
        QuizEngine::new(Arc::new(catalog))
    }

    fn assert_invariants(session: &QuizSession) {
        let answered = session.current_index() + usize::from(session.is_submitted());
        assert!(session.score() as usize <= answered);
        assert!(session.score() as usize <= session.len());
        assert!(session.current_index() <= session.len());
        assert_eq!(
            session.current_index() == session.len(),
            session.is_completed()
        );
    }

    fn is_invalid_transition(result: Result<impl std::fmt::Debug>) -> bool {
        matches!(result, Err(AwarenessError::InvalidStateTransition { .. }))
    }

    #[test]
    fn test_all_correct_scenario() {
        let engine = two_question_engine();
        let mut session = engine.start_session("student");
        assert_eq!(session.state(), QuizState::InProgress);

        session.select_answer(1).unwrap();
        assert!(session.submit_answer().unwrap());
        assert_eq!(session.score(), 1);
        assert_eq!(session.advance().unwrap(), QuizState::InProgress);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.selected_answer(), None);

        session.select_answer(0).unwrap();
        session.submit_answer().unwrap();
        assert_eq!(session.score(), 2);
        assert_eq!(session.advance().unwrap(), QuizState::Completed);
        assert_eq!(session.current_index(), 2);
        assert!(session.is_completed());
        assert!(session.completed_at().is_some());

        let report = session.report().unwrap();
        assert_eq!(report.percentage, 100);
        assert_eq!(report.tier, ScoreTier::Perfect);
    }

    #[test]
    fn test_all_wrong_scenario() {
        let engine = two_question_engine();
        let mut session = engine.start_session("student");

        session.select_answer(3).unwrap();
        assert!(!session.submit_answer().unwrap());
        assert_eq!(session.last_answer_correct(), Some(false));
        session.advance().unwrap();
        session.select_answer(2).unwrap();
        session.submit_answer().unwrap();
        session.advance().unwrap();

        let report = session.report().unwrap();
        assert_eq!(report.score, 0);
        assert_eq!(report.percentage, 0);
        assert_eq!(report.tier, ScoreTier::Low);
    }

    #[test]
    fn test_score_counts_submitted_answer_before_advance() {
        let engine = two_question_engine();
        let mut session = engine.start_session("student");
        session.select_answer(1).unwrap();
        session.submit_answer().unwrap();

        assert_eq!(session.score(), 1);
        assert_eq!(session.current_index(), 0);
        assert!(session.is_submitted());
        assert_invariants(&session);

        session.advance().unwrap();
        assert_eq!(session.score() as usize, session.current_index());
        assert_invariants(&session);
    }

    #[test]
    fn test_double_submit_does_not_double_count() {
        let engine = two_question_engine();
        let mut session = engine.start_session("student");
        session.select_answer(1).unwrap();
        session.submit_answer().unwrap();

        assert!(is_invalid_transition(session.submit_answer()));
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_out_of_range_selection_leaves_session_unchanged() {
        let engine = two_question_engine();
        let mut session = engine.start_session("student");
        let before = session.clone();

        assert!(is_invalid_transition(session.select_answer(4)));
        assert_eq!(session, before);
    }

    #[test]
    fn test_out_of_order_operations_fail() {
        let engine = two_question_engine();
        let mut session = engine.start_session("student");

        assert!(is_invalid_transition(session.submit_answer()));
        assert!(is_invalid_transition(session.advance()));

        session.select_answer(0).unwrap();
        assert!(is_invalid_transition(session.select_answer(1)));
        assert!(is_invalid_transition(session.advance()));

        session.submit_answer().unwrap();
        assert!(is_invalid_transition(session.select_answer(1)));
        session.advance().unwrap();
        session.select_answer(0).unwrap();
        session.submit_answer().unwrap();
        session.advance().unwrap();

        let finished = session.clone();
        assert!(is_invalid_transition(session.select_answer(0)));
        assert!(is_invalid_transition(session.submit_answer()));
        assert!(is_invalid_transition(session.advance()));
        assert_eq!(session, finished);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn test_report_only_when_completed() {
        let engine = two_question_engine();
        let mut session = engine.start_session("student");
        session.select_answer(1).unwrap();
        session.submit_answer().unwrap();
        assert!(session.report().is_none());
    }

    #[test]
    fn test_restart_resets_state() {
        let engine = two_question_engine();
        let mut session = engine.start_session("student");
        session.select_answer(1).unwrap();
        session.submit_answer().unwrap();
        session.advance().unwrap();

        let fresh = engine.restart(&session);
        assert_ne!(fresh.id(), session.id());
        assert_eq!(fresh.cohort(), "student");
        assert_eq!(fresh.current_index(), 0);
        assert_eq!(fresh.score(), 0);
        assert_eq!(fresh.selected_answer(), None);
        assert_eq!(fresh.state(), QuizState::InProgress);
    }

    #[test]
    fn test_unknown_cohort_gets_student_questions() {
        let engine = QuizEngine::new(Arc::new(content::builtin_quiz().unwrap()));
        let session = engine.start_session("astronaut");
        let student = engine.start_session("student");
        assert_eq!(session.questions(), student.questions());
        assert_eq!(session.cohort(), "astronaut");

        let senior = engine.start_session("senior");
        assert_ne!(senior.questions(), student.questions());
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(ScoreTier::from_percentage(100), ScoreTier::Perfect);
        assert_eq!(ScoreTier::from_percentage(99), ScoreTier::High);
        assert_eq!(ScoreTier::from_percentage(80), ScoreTier::High);
        assert_eq!(ScoreTier::from_percentage(79), ScoreTier::Medium);
        assert_eq!(ScoreTier::from_percentage(60), ScoreTier::Medium);
        assert_eq!(ScoreTier::from_percentage(59), ScoreTier::Low);
        assert!(ScoreTier::Perfect > ScoreTier::High && ScoreTier::Medium > ScoreTier::Low);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(QuizReport::new("student", 2, 3).percentage, 67);
        assert_eq!(QuizReport::new("student", 1, 3).percentage, 33);
        assert_eq!(QuizReport::new("student", 1, 2).tier, ScoreTier::Low);
        assert_eq!(QuizReport::new("student", 4, 5).tier, ScoreTier::High);
    }

    #[test]
    fn test_invariants_hold_under_random_operations() {
        let engine = QuizEngine::new(Arc::new(content::builtin_quiz().unwrap()));
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..200 {
            let mut session = engine.start_session(Cohort::ALL[rng.gen_range(0..5)].as_str());
            let mut last_score = 0;
            for _ in 0..30 {
                let before = session.clone();
                let result = match rng.gen_range(0..3) {
                    0 => session.select_answer(rng.gen_range(0..6)).map(|_| ()),
                    1 => session.submit_answer().map(|_| ()),
                    _ => session.advance().map(|_| ()),
                };
                if result.is_err() {
                    assert_eq!(session, before);
                }
                assert_invariants(&session);
                assert!(session.score() >= last_score);
                last_score = session.score();
            }
        }
    }
}
