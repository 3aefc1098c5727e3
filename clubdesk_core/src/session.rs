//! Practice session engine.
//!
//! Drives a quiz-style loop over the filtered problem catalog: draw a random
//! problem, accept one answer, tally it, move on. A problem is never shown
//! twice within one session; running out of eligible problems is a normal
//! terminal state, not an error.
//!
//! The session owns its state exclusively (one user, one run) and borrows
//! the shared, read-only catalog on each operation.

use crate::catalog::Catalog;
use crate::types::{FilterSelection, Problem};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Where the session is in its loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No problem loaded; the matching set was empty
    Idle,
    /// A problem is shown and awaiting an answer
    Presented,
    /// The shown problem has been answered
    Answered,
    /// Every matching problem has been answered
    Completed,
}

/// One user's interactive practice run
///
/// Bounded by filter changes or an explicit reset. All operations are
/// synchronous, total, and proportional to catalog size.
#[derive(Debug)]
pub struct PracticeSession {
    filter: FilterSelection,
    /// Catalog indices still eligible for drawing (swap-removed on draw)
    eligible: Vec<usize>,
    current: Option<usize>,
    answered: HashSet<String>,
    correct: u32,
    incorrect: u32,
    phase: Phase,
    selected_answer: Option<usize>,
    solution_revealed: bool,
    rng: StdRng,
}

impl PracticeSession {
    /// Start a session over the problems matching `filter`
    pub fn new(catalog: &Catalog, filter: FilterSelection) -> Self {
        Self::with_rng(catalog, filter, StdRng::from_entropy())
    }

    /// Start a session with an explicit random source (deterministic tests)
    pub fn with_rng(catalog: &Catalog, filter: FilterSelection, rng: StdRng) -> Self {
        let mut session = Self {
            filter,
            eligible: Vec::new(),
            current: None,
            answered: HashSet::new(),
            correct: 0,
            incorrect: 0,
            phase: Phase::Idle,
            selected_answer: None,
            solution_revealed: false,
            rng,
        };
        session.restart(catalog);
        session
    }

    /// Replace the filter selection and start over
    ///
    /// Clears the answered set and both counters, then draws a fresh problem
    /// from the full new matching set (or goes `Idle` if it is empty).
    pub fn apply_filters(&mut self, catalog: &Catalog, filter: FilterSelection) {
        self.filter = filter;
        self.restart(catalog);
    }

    /// Start over with the current filter selection unchanged
    pub fn reset(&mut self, catalog: &Catalog) {
        self.restart(catalog);
    }

    /// Submit an answer for the presented problem
    ///
    /// First answer is final: the problem id joins the answered set and
    /// exactly one counter is bumped. Submitting in any phase other than
    /// `Presented` is a no-op.
    pub fn submit_answer(&mut self, catalog: &Catalog, choice: usize) {
        if self.phase != Phase::Presented {
            tracing::debug!(phase = ?self.phase, "Ignoring answer outside Presented phase");
            return;
        }

        let Some(idx) = self.current else {
            return;
        };
        let problem = &catalog.problems[idx];

        self.answered.insert(problem.id.clone());
        self.selected_answer = Some(choice);
        if choice == problem.correct_answer {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.phase = Phase::Answered;
    }

    /// Advance to the next problem after answering
    ///
    /// Draws uniformly from the remaining eligible set; when none remain the
    /// session reaches the terminal `Completed` phase. No-op unless the
    /// current problem has been answered, and a no-op once `Completed`.
    pub fn next_problem(&mut self, catalog: &Catalog) {
        if self.phase != Phase::Answered {
            return;
        }
        self.draw(catalog, Phase::Completed);
    }

    /// Toggle visibility of the solution for the answered problem
    pub fn toggle_solution(&mut self) {
        if self.phase == Phase::Answered {
            self.solution_revealed = !self.solution_revealed;
        }
    }

    /// The problem currently on display, if any
    pub fn current_problem<'a>(&self, catalog: &'a Catalog) -> Option<&'a Problem> {
        self.current.map(|idx| &catalog.problems[idx])
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn filter(&self) -> &FilterSelection {
        &self.filter
    }

    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    pub fn incorrect_count(&self) -> u32 {
        self.incorrect
    }

    pub fn answered_count(&self) -> usize {
        self.answered.len()
    }

    /// Matching problems not yet shown (excludes the one on display)
    pub fn remaining(&self) -> usize {
        self.eligible.len()
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.selected_answer
    }

    pub fn solution_revealed(&self) -> bool {
        self.solution_revealed
    }

    /// Recompute the matching set from the filter and draw the first problem
    fn restart(&mut self, catalog: &Catalog) {
        self.eligible = catalog.filter(&self.filter);
        self.current = None;
        self.answered.clear();
        self.correct = 0;
        self.incorrect = 0;
        tracing::debug!(matching = self.eligible.len(), "Practice session (re)started");
        self.draw(catalog, Phase::Idle);
    }

    /// Draw uniformly from the eligible set, or fall into `exhausted_phase`
    fn draw(&mut self, catalog: &Catalog, exhausted_phase: Phase) {
        self.selected_answer = None;
        self.solution_revealed = false;

        if self.eligible.is_empty() {
            self.current = None;
            self.phase = exhausted_phase;
            return;
        }

        let pick = self.rng.gen_range(0..self.eligible.len());
        let idx = self.eligible.swap_remove(pick);
        debug_assert!(!self.answered.contains(&catalog.problems[idx].id));
        self.current = Some(idx);
        self.phase = Phase::Presented;
    }
}
