//! Goal prioritisation.
//!
//! Incomplete goals are ordered by difficulty (hard first, see
//! `Difficulty`'s ordering) and then by target amount, largest first. The
//! sort is stable: goals equal on both keys keep their input order.

use std::cmp::Ordering;

use crate::backend::domain::models::Goal;

fn priority(a: &Goal, b: &Goal) -> Ordering {
    a.difficulty
        .cmp(&b.difficulty)
        .then_with(|| b.target_amount.cmp(&a.target_amount))
}

/// All incomplete goals, highest priority first
pub fn rank_goals(goals: &[Goal]) -> Vec<&Goal> {
    let mut ranked: Vec<&Goal> = goals.iter().filter(|goal| !goal.completed).collect();
    ranked.sort_by(|a, b| priority(a, b));
    ranked
}

/// The single goal to work on next, or `None` if every goal is completed
pub fn select_top_goal(goals: &[Goal]) -> Option<&Goal> {
    rank_goals(goals).into_iter().next()
}
