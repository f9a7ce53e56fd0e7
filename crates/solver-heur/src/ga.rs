use rand::seq::SliceRandom;
use rand::Rng;

use sched_core::constraints::{consistent, PartialAssignment};
use sched_core::domain::Candidate;
use sched_core::scoring::evaluate;
use sched_core::Problem;
use types::all_slots;

pub const POPULATION_SIZE: usize = 50;
pub const GENERATIONS: usize = 100;
pub const ELITE_FRACTION: f64 = 0.10;
pub const SELECTION_FRACTION: f64 = 0.20;
pub const MUTATION_RATE: f64 = 0.10;

#[derive(Clone)]
pub struct Individual {
    pub placements: Vec<Option<Candidate>>,
    pub fitness: f64,
}

impl Individual {
    fn scored(problem: &Problem, placements: Vec<Option<Candidate>>) -> Self {
        let fitness = evaluate(problem, &placements).fitness;
        Individual { placements, fitness }
    }
}

/// Randomized feasible-seeding construction: shuffle the Lesson order, then
/// for each Lesson greedily pick a random
/// qualifying instructor, a random capacity-sufficient room, and the first
/// conflict-free Slot across a shuffled Slot list. A Lesson with no
/// conflict-free Slot is simply left unplaced — the fitness evaluator's
/// count-deviation term penalizes that outcome rather than aborting
/// construction outright, which keeps fitness strictly positive (every
/// returned schedule satisfies fitness ∈ (0, 1]).
pub fn construct_random(problem: &Problem, daily_cap: u32, rng: &mut impl Rng) -> Individual {
    let slots = all_slots();
    let mut order: Vec<usize> = (0..problem.lessons.len()).collect();
    order.shuffle(rng);

    let mut assignment = PartialAssignment::new(problem.lessons.len());
    for lesson_idx in order {
        place_one(problem, &mut assignment, lesson_idx, daily_cap, &slots, rng);
    }
    Individual::scored(problem, assignment.committed)
}

fn place_one(
    problem: &Problem,
    assignment: &mut PartialAssignment,
    lesson_idx: usize,
    daily_cap: u32,
    slots: &[types::Slot],
    rng: &mut impl Rng,
) -> bool {
    let lesson = &problem.lessons[lesson_idx];
    let effective_size = problem.effective_size(lesson);

    let valid_rooms: Vec<usize> = problem
        .instance
        .rooms
        .iter()
        .enumerate()
        .filter(|(_, r)| r.capacity >= effective_size)
        .map(|(i, _)| i)
        .collect();
    let valid_instructors: Vec<usize> = problem
        .instance
        .instructors
        .iter()
        .enumerate()
        .filter(|(_, instructor)| instructor.can_teach(&lesson.subject_id, lesson.kind))
        .map(|(i, _)| i)
        .collect();
    if valid_rooms.is_empty() || valid_instructors.is_empty() {
        return false;
    }

    let room_idx = *valid_rooms.choose(rng).expect("non-empty");
    let instr_idx = *valid_instructors.choose(rng).expect("non-empty");

    let mut slot_order: Vec<usize> = (0..slots.len()).collect();
    slot_order.shuffle(rng);
    for slot_idx in slot_order {
        let candidate = (slot_idx, room_idx, instr_idx);
        if consistent(problem, assignment, lesson_idx, candidate, daily_cap) {
            assignment.commit(lesson_idx, candidate);
            return true;
        }
    }
    false
}

/// Uniform-by-Slot crossover: for each Slot, flip a coin to decide which
/// parent's bucket of Lessons at that Slot gets copied into the child (both
/// parents' committed tuple, unchanged); a copy that would conflict with an
/// already-committed child Lesson is dropped silently.
pub fn crossover(problem: &Problem, daily_cap: u32, a: &Individual, b: &Individual, rng: &mut impl Rng) -> Individual {
    let slots = all_slots();
    let mut assignment = PartialAssignment::new(problem.lessons.len());

    for slot_idx in 0..slots.len() {
        let source = if rng.gen_bool(0.5) { &a.placements } else { &b.placements };
        let mut lesson_indices: Vec<usize> = (0..problem.lessons.len())
            .filter(|&li| matches!(source[li], Some((s, _, _)) if s == slot_idx))
            .collect();
        lesson_indices.sort_unstable();

        for lesson_idx in lesson_indices {
            if assignment.committed[lesson_idx].is_some() {
                continue;
            }
            let candidate = source[lesson_idx].expect("filtered above");
            if consistent(problem, &assignment, lesson_idx, candidate, daily_cap) {
                assignment.commit(lesson_idx, candidate);
            }
        }
    }
    Individual::scored(problem, assignment.committed)
}

/// The four structural mutation operators, adapted to this workspace's
/// representation: week placement is derived from
/// `Subject.week_type` at materialization time rather than chosen by the
/// solver (see DESIGN.md), so the "move a Slot's bucket to the other week"
/// operator is reinterpreted as moving a Slot's bucket to a different Slot
/// — the nearest structural analogue available on this representation.
pub fn mutate(problem: &Problem, daily_cap: u32, individual: &Individual, rng: &mut impl Rng) -> Individual {
    let slots = all_slots();
    let mut assignment = PartialAssignment {
        committed: individual.placements.clone(),
    };

    if rng.gen_bool(MUTATION_RATE) {
        move_bucket(problem, &mut assignment, daily_cap, &slots, rng);
    }
    if rng.gen_bool(MUTATION_RATE) {
        add_subject_lessons(problem, &mut assignment, daily_cap, &slots, rng);
    }
    if rng.gen_bool(MUTATION_RATE) {
        remove_lesson_and_siblings(problem, &mut assignment, rng);
    }
    for lesson_idx in 0..problem.lessons.len() {
        if assignment.committed[lesson_idx].is_none() {
            continue;
        }
        if rng.gen_bool(MUTATION_RATE) {
            reroll_slot(problem, &mut assignment, lesson_idx, daily_cap, &slots, rng);
        }
    }

    Individual::scored(problem, assignment.committed)
}

fn move_bucket(
    problem: &Problem,
    assignment: &mut PartialAssignment,
    daily_cap: u32,
    slots: &[types::Slot],
    rng: &mut impl Rng,
) {
    let occupied_slots: Vec<usize> = (0..slots.len())
        .filter(|&s| (0..problem.lessons.len()).any(|li| matches!(assignment.committed[li], Some((ls, _, _)) if ls == s)))
        .collect();
    let Some(&from_slot) = occupied_slots.choose(rng) else { return };
    let to_slot = rng.gen_range(0..slots.len());
    if from_slot == to_slot {
        return;
    }

    let bucket: Vec<usize> = (0..problem.lessons.len())
        .filter(|&li| matches!(assignment.committed[li], Some((ls, _, _)) if ls == from_slot))
        .collect();

    let mut trial = PartialAssignment { committed: assignment.committed.clone() };
    for &li in &bucket {
        trial.undo(li);
    }
    let mut candidates = Vec::with_capacity(bucket.len());
    for &li in &bucket {
        let (_, room_idx, instr_idx) = assignment.committed[li].expect("in bucket");
        let candidate = (to_slot, room_idx, instr_idx);
        if !consistent(problem, &trial, li, candidate, daily_cap) {
            return; // any conflict aborts the whole move
        }
        candidates.push((li, candidate));
        trial.commit(li, candidate);
    }
    for (li, candidate) in candidates {
        assignment.undo(li);
        assignment.commit(li, candidate);
    }
}

fn add_subject_lessons(
    problem: &Problem,
    assignment: &mut PartialAssignment,
    daily_cap: u32,
    slots: &[types::Slot],
    rng: &mut impl Rng,
) {
    let unplaced_subjects: Vec<&types::Subject> = problem
        .instance
        .subjects
        .iter()
        .filter(|subject| {
            problem
                .lessons
                .iter()
                .enumerate()
                .any(|(li, l)| l.subject_id == subject.id && assignment.committed[li].is_none())
        })
        .collect();
    let Some(subject) = unplaced_subjects.choose(rng) else { return };

    let unplaced: Vec<usize> = problem
        .lessons
        .iter()
        .enumerate()
        .filter(|(li, l)| l.subject_id == subject.id && assignment.committed[*li].is_none())
        .map(|(li, _)| li)
        .collect();

    for lesson_idx in unplaced {
        place_one(problem, assignment, lesson_idx, daily_cap, slots, rng);
    }
}

fn remove_lesson_and_siblings(problem: &Problem, assignment: &mut PartialAssignment, rng: &mut impl Rng) {
    let placed: Vec<usize> = (0..problem.lessons.len())
        .filter(|&li| assignment.committed[li].is_some())
        .collect();
    let Some(&victim) = placed.choose(rng) else { return };
    let lesson = &problem.lessons[victim];

    if let Some(subgroup) = lesson.subgroup.clone() {
        let siblings: Vec<usize> = problem
            .lessons
            .iter()
            .enumerate()
            .filter(|(_, l)| {
                l.subject_id == lesson.subject_id
                    && l.group_id == lesson.group_id
                    && l.kind == lesson.kind
                    && l.subgroup.as_deref() == Some(subgroup.as_str())
            })
            .map(|(i, _)| i)
            .collect();
        for i in siblings {
            assignment.undo(i);
        }
    } else {
        assignment.undo(victim);
    }
}

fn reroll_slot(
    problem: &Problem,
    assignment: &mut PartialAssignment,
    lesson_idx: usize,
    daily_cap: u32,
    slots: &[types::Slot],
    rng: &mut impl Rng,
) {
    let Some((_, room_idx, instr_idx)) = assignment.committed[lesson_idx] else { return };
    let new_slot = rng.gen_range(0..slots.len());
    let candidate = (new_slot, room_idx, instr_idx);

    let mut trial = PartialAssignment { committed: assignment.committed.clone() };
    trial.undo(lesson_idx);
    if consistent(problem, &trial, lesson_idx, candidate, daily_cap) {
        assignment.undo(lesson_idx);
        assignment.commit(lesson_idx, candidate);
    }
}
