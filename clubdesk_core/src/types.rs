//! Core domain types for the Clubdesk system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Practice problems and their facets (exam, topic, difficulty)
//! - Filter selections for practice sessions
//! - Club registrations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Problem Types
// ============================================================================

/// Which competition a problem is drawn from
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Exam {
    Fma,
    PhysicsBowl,
}

impl Exam {
    /// Display name used in the UI and CLI
    pub fn label(&self) -> &'static str {
        match self {
            Exam::Fma => "F=ma",
            Exam::PhysicsBowl => "Physics Bowl",
        }
    }
}

/// Problem difficulty, ordered easiest to hardest
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// All difficulties in ascending order
pub const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A multiple-choice practice problem
///
/// Question, choices, and solution text may embed inline `$...$` math markup;
/// rendering is the display layer's concern. Invariant:
/// `correct_answer < choices.len()` (enforced by `Catalog::validate`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub exam: Exam,
    pub topic: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub choices: Vec<String>,
    pub correct_answer: usize,
    pub solution: String,
}

// ============================================================================
// Filter Types
// ============================================================================

/// Exam facet of a filter selection
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExamFilter {
    Fma,
    PhysicsBowl,
    #[default]
    Both,
}

impl ExamFilter {
    /// Whether a problem from the given exam passes this facet
    pub fn allows(&self, exam: Exam) -> bool {
        match self {
            ExamFilter::Both => true,
            ExamFilter::Fma => exam == Exam::Fma,
            ExamFilter::PhysicsBowl => exam == Exam::PhysicsBowl,
        }
    }
}

/// A transient facet filter selection for a practice session
///
/// Empty topic or difficulty lists mean "no restriction" on that facet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub exam: ExamFilter,
    pub topics: Vec<String>,
    pub difficulties: Vec<Difficulty>,
}

impl FilterSelection {
    /// A problem matches iff all three facet conditions hold
    pub fn matches(&self, problem: &Problem) -> bool {
        let exam_ok = self.exam.allows(problem.exam);
        let topic_ok = self.topics.is_empty() || self.topics.iter().any(|t| t == &problem.topic);
        let difficulty_ok =
            self.difficulties.is_empty() || self.difficulties.contains(&problem.difficulty);
        exam_ok && topic_ok && difficulty_ok
    }
}

// ============================================================================
// Registration Types
// ============================================================================

/// A club sign-up submitted through the registration form
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Registration {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub grade: String,
    pub events: Vec<String>,
    pub physics_courses: Vec<String>,
    pub physics_other: Option<String>,
    pub math_courses: Vec<String>,
    pub math_other: Option<String>,
    pub meeting_preference: Vec<String>,
    pub meeting_other: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Registration {
    /// Validate the registration for required fields
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.first_name.trim().is_empty() {
            errors.push("First name is required".to_string());
        }
        if self.last_name.trim().is_empty() {
            errors.push("Last name is required".to_string());
        }
        if self.grade.trim().is_empty() {
            errors.push("Grade is required".to_string());
        }
        if self.email.trim().is_empty() {
            errors.push("Email is required".to_string());
        } else if !self.email.contains('@') {
            errors.push(format!("Invalid email address '{}'", self.email));
        }
        if self.events.is_empty() {
            errors.push("Select at least one event".to_string());
        }

        errors
    }
}
