use crate::domain::Candidate;
use crate::problem::Problem;
use std::collections::HashSet;
use types::{all_slots, LessonId};

/// Dense, index-keyed view of a (partial or full) assignment: `committed[i]`
/// is the tuple chosen for `problem.lessons[i]`, or `None` while unassigned.
///
/// Week parity is *not* evaluated here: the solver produces one assignment
/// ignoring parity, and [`crate::materialize`] projects it onto even/odd
/// timetables per `Subject.week_type` afterwards. See DESIGN.md for the
/// reasoning behind this split.
pub struct PartialAssignment {
    pub committed: Vec<Option<Candidate>>,
}

impl PartialAssignment {
    pub fn new(lesson_count: usize) -> Self {
        Self {
            committed: vec![None; lesson_count],
        }
    }

    pub fn commit(&mut self, lesson_idx: usize, value: Candidate) {
        self.committed[lesson_idx] = Some(value);
    }

    pub fn undo(&mut self, lesson_idx: usize) {
        self.committed[lesson_idx] = None;
    }

    pub fn is_complete(&self) -> bool {
        self.committed.iter().all(Option::is_some)
    }

    pub fn unassigned(&self) -> impl Iterator<Item = usize> + '_ {
        self.committed
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
    }
}

/// Pure hard-constraint oracle: would committing `value` to `lesson_idx`
/// keep room/instructor/group exclusivity, capacity, qualification and the
/// weekly and daily instructor caps satisfied against `assignment`'s
/// existing commitments? `daily_cap` bounds how many lessons an instructor
/// may teach on a single day.
pub fn consistent(
    problem: &Problem,
    assignment: &PartialAssignment,
    lesson_idx: usize,
    value: Candidate,
    daily_cap: u32,
) -> bool {
    let (slot_idx, room_idx, instr_idx) = value;
    let lesson = &problem.lessons[lesson_idx];
    let slots = all_slots();
    let slot = slots[slot_idx];

    // Room capacity.
    if problem.room(room_idx).capacity < problem.effective_size(lesson) {
        return false;
    }
    // Instructor qualification.
    if !problem
        .instructor(instr_idx)
        .can_teach(&lesson.subject_id, lesson.kind)
    {
        return false;
    }

    let mut instructor_hours = 0u32;
    let mut instructor_daily = 0u32;

    for (other_idx, other_value) in assignment.committed.iter().enumerate() {
        let Some((o_slot, o_room, o_instr)) = other_value else {
            continue;
        };
        if other_idx == lesson_idx {
            continue;
        }
        let other_lesson = &problem.lessons[other_idx];

        if *o_instr == instr_idx {
            instructor_hours += 1;
            if slots[*o_slot].day == slot.day {
                instructor_daily += 1;
            }
        }

        if *o_slot != slot_idx {
            continue;
        }

        // Room double-booking.
        if *o_room == room_idx {
            return false;
        }
        // Instructor double-booking.
        if *o_instr == instr_idx {
            return false;
        }
        // Group/subgroup overlap.
        if other_lesson.group_id == lesson.group_id {
            match (&lesson.subgroup, &other_lesson.subgroup) {
                (Some(a), Some(b)) if a == b => return false,
                (None, _) | (_, None) => return false,
                _ => {}
            }
        }
    }

    // Weekly workload cap.
    if instructor_hours + 1 > problem.instructor(instr_idx).max_hours_per_week {
        return false;
    }
    // Daily cap.
    if instructor_daily + 1 > daily_cap {
        return false;
    }

    true
}

/// Count of values in `domain(lesson_idx)` that would be eliminated for
/// *other* unassigned variables if `value` were committed (least-constraining-
/// value scoring): same slot with the same room or instructor, or same slot
/// under the subgroup-overlap rule for the same group.
pub fn eliminated_by(
    problem: &Problem,
    domains: &[Vec<Candidate>],
    lesson_idx: usize,
    value: Candidate,
    unassigned: &HashSet<usize>,
) -> usize {
    let (slot_idx, room_idx, instr_idx) = value;
    let lesson = &problem.lessons[lesson_idx];

    let mut count = 0usize;
    for &other_idx in unassigned {
        if other_idx == lesson_idx {
            continue;
        }
        let other_lesson = &problem.lessons[other_idx];
        for &(o_slot, o_room, o_instr) in &domains[other_idx] {
            if o_slot != slot_idx {
                continue;
            }
            if o_room == room_idx || o_instr == instr_idx {
                count += 1;
                continue;
            }
            if other_lesson.group_id == lesson.group_id {
                let clash = match (&lesson.subgroup, &other_lesson.subgroup) {
                    (Some(a), Some(b)) => a == b,
                    _ => true,
                };
                if clash {
                    count += 1;
                }
            }
        }
    }
    count
}

/// Two lessons are neighbors iff they share a group or at least one
/// candidate instructor.
pub fn is_neighbor(problem: &Problem, domains: &[Vec<Candidate>], a: usize, b: usize) -> bool {
    if problem.lessons[a].group_id == problem.lessons[b].group_id {
        return true;
    }
    let instructors_a: HashSet<usize> = domains[a].iter().map(|&(_, _, i)| i).collect();
    domains[b].iter().any(|&(_, _, i)| instructors_a.contains(&i))
}

#[allow(dead_code)]
pub fn lesson_id_of(problem: &Problem, lesson_idx: usize) -> LessonId {
    problem.lessons[lesson_idx].id
}
