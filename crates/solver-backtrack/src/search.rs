use std::collections::HashSet;

use sched_core::constraints::{consistent, eliminated_by, is_neighbor, PartialAssignment};
use sched_core::domain::{build_domains, Candidate};
use sched_core::{CancelToken, Problem};
use types::all_slots;

pub enum Outcome {
    Solved(Vec<Option<Candidate>>),
    Infeasible,
    Cancelled,
}

/// MRV + degree + LCV depth-first search producing one feasible assignment.
/// Checks `cancel` between variable expansions; on cancellation the search
/// unwinds without returning a partial assignment.
pub fn search(problem: &Problem, daily_cap: u32, cancel: &CancelToken) -> Outcome {
    let domains = build_domains(problem);
    let mut assignment = PartialAssignment::new(problem.lessons.len());

    match backtrack(problem, &domains, &mut assignment, daily_cap, cancel) {
        Ok(true) => Outcome::Solved(assignment.committed),
        Ok(false) => Outcome::Infeasible,
        Err(()) => Outcome::Cancelled,
    }
}

fn backtrack(
    problem: &Problem,
    domains: &[Vec<Candidate>],
    assignment: &mut PartialAssignment,
    daily_cap: u32,
    cancel: &CancelToken,
) -> Result<bool, ()> {
    if cancel.is_cancelled() {
        return Err(());
    }
    if assignment.is_complete() {
        return Ok(true);
    }

    let unassigned: HashSet<usize> = assignment.unassigned().collect();
    let lesson_idx = choose_variable(problem, domains, assignment, &unassigned, daily_cap);

    let consistent_values: Vec<Candidate> = domains[lesson_idx]
        .iter()
        .copied()
        .filter(|&v| consistent(problem, assignment, lesson_idx, v, daily_cap))
        .collect();
    if consistent_values.is_empty() {
        return Ok(false);
    }

    let ordered = order_values(problem, domains, lesson_idx, consistent_values, &unassigned);
    for value in ordered {
        assignment.commit(lesson_idx, value);
        if backtrack(problem, domains, assignment, daily_cap, cancel)? {
            return Ok(true);
        }
        assignment.undo(lesson_idx);
    }
    Ok(false)
}

/// Picks the unassigned Lesson with fewest currently-consistent candidates,
/// breaking ties by highest degree (neighbor count among other unassigned
/// Lessons) then by ascending Lesson id.
fn choose_variable(
    problem: &Problem,
    domains: &[Vec<Candidate>],
    assignment: &PartialAssignment,
    unassigned: &HashSet<usize>,
    daily_cap: u32,
) -> usize {
    unassigned
        .iter()
        .copied()
        .map(|idx| {
            let remaining = domains[idx]
                .iter()
                .filter(|&&v| consistent(problem, assignment, idx, v, daily_cap))
                .count();
            let degree = unassigned
                .iter()
                .filter(|&&other| other != idx && is_neighbor(problem, domains, idx, other))
                .count();
            (idx, remaining, degree)
        })
        .min_by(|a, b| a.1.cmp(&b.1).then(b.2.cmp(&a.2)).then(a.0.cmp(&b.0)))
        .map(|(idx, _, _)| idx)
        .expect("unassigned set is non-empty")
}

/// Sorts candidates ascending by elimination count (LCV), tie-broken
/// lexicographically by (day_index, period, room_id, instructor_id).
fn order_values(
    problem: &Problem,
    domains: &[Vec<Candidate>],
    lesson_idx: usize,
    mut values: Vec<Candidate>,
    unassigned: &HashSet<usize>,
) -> Vec<Candidate> {
    let slots = all_slots();
    let rest: HashSet<usize> = unassigned.iter().copied().filter(|&i| i != lesson_idx).collect();

    values.sort_by(|&a, &b| {
        let ea = eliminated_by(problem, domains, lesson_idx, a, &rest);
        let eb = eliminated_by(problem, domains, lesson_idx, b, &rest);
        ea.cmp(&eb).then_with(|| {
            let slot_a = slots[a.0];
            let slot_b = slots[b.0];
            (slot_a.day.index(), slot_a.period, problem.room(a.1).id.clone(), problem.instructor(a.2).id.clone())
                .cmp(&(slot_b.day.index(), slot_b.period, problem.room(b.1).id.clone(), problem.instructor(b.2).id.clone()))
        })
    });
    values
}
