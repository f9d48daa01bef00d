//! Trivia mini-game.
//!
//! A spin picks one of the categories at random, then the player answers its
//! questions in order. Only the first answer to each question counts.

use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{TriviaError, TriviaResult};

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct: usize,
    pub explanation: String,
}

impl Question {
    /// Text of the correct option, `None` when `correct` points past `options`.
    pub fn correct_answer(&self) -> Option<&str> {
        self.options.get(self.correct).map(String::as_str)
    }
}

/// One slice of the wheel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub questions: Vec<Question>,
}

/// Every category available on the wheel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub categories: Vec<Category>,
}

static BUILTIN: Lazy<QuestionBank> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../data/trivia.json"))
        .expect("Invalid embedded trivia bank")
});

impl QuestionBank {
    /// The question bank shipped with the binary.
    pub fn builtin() -> &'static QuestionBank {
        &BUILTIN
    }

    /// Find a category by id.
    pub fn get(&self, id: &str) -> TriviaResult<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| TriviaError::UnknownCategory(id.to_string()))
    }

    /// Find a category by wheel position.
    pub fn by_index(&self, index: usize) -> TriviaResult<&Category> {
        self.categories
            .get(index)
            .ok_or_else(|| TriviaError::UnknownCategory(index.to_string()))
    }

    /// Spin the wheel. `None` when there is nothing to land on.
    pub fn spin<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.categories.is_empty() {
            None
        } else {
            Some(rng.gen_range(0..self.categories.len()))
        }
    }
}

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_option: usize,
    pub explanation: String,
}

/// Progress through one category's questions.
#[derive(Debug, Clone)]
pub struct TriviaGame<'a> {
    category: &'a Category,
    index: usize,
    selected: Option<usize>,
    score: usize,
    complete: bool,
}

impl<'a> TriviaGame<'a> {
    pub fn new(category: &'a Category) -> Self {
        Self {
            category,
            index: 0,
            selected: None,
            score: 0,
            complete: category.questions.is_empty(),
        }
    }

    pub fn category(&self) -> &'a Category {
        self.category
    }

    /// Question being played, `None` once the quiz is complete.
    pub fn current(&self) -> Option<&'a Question> {
        if self.complete {
            None
        } else {
            self.category.questions.get(self.index)
        }
    }

    /// Zero-based position of the current question.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn answer(&mut self, option: usize) -> TriviaResult<AnswerOutcome> {
        let question = self.current().ok_or(TriviaError::QuizComplete)?;
        if self.selected.is_some() {
            return Err(TriviaError::AlreadyAnswered);
        }
        if option >= question.options.len() {
            return Err(TriviaError::OptionOutOfRange {
                option,
                available: question.options.len(),
            });
        }

        self.selected = Some(option);
        let correct = option == question.correct;
        if correct {
            self.score += 1;
        }

        Ok(AnswerOutcome {
            correct,
            correct_option: question.correct,
            explanation: question.explanation.clone(),
        })
    }

    /// Move to the next question. Returns `false` when the quiz just ended.
    pub fn next(&mut self) -> TriviaResult<bool> {
        if self.complete {
            return Err(TriviaError::QuizComplete);
        }
        if self.selected.is_none() {
            return Err(TriviaError::NotAnswered);
        }

        self.selected = None;
        if self.index + 1 < self.category.questions.len() {
            self.index += 1;
            Ok(true)
        } else {
            self.complete = true;
            Ok(false)
        }
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.category.questions.len()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn feedback(&self) -> &'static str {
        feedback_message(self.score, self.total())
    }
}

/// End-of-quiz message for a score.
pub fn feedback_message(score: usize, total: usize) -> &'static str {
    let percentage = if total == 0 {
        0.0
    } else {
        score as f64 / total as f64 * 100.0
    };

    if percentage >= 100.0 {
        "🌟 Perfect score! You're an eco expert!"
    } else if percentage >= 80.0 {
        "🎉 Great job! You really know your stuff!"
    } else if percentage >= 50.0 {
        "👍 Not bad! Keep learning and growing."
    } else {
        "🌱 Every expert starts somewhere. Keep it up!"
    }
}
