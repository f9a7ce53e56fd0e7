use types::{all_slots, Slot};

use crate::problem::Problem;

/// A single candidate `(slot_idx, room_idx, instructor_idx)` tuple, indices
/// into `problem.instance.rooms`/`instance.instructors` and into the fixed
/// 20-element slot universe.
pub type Candidate = (usize, usize, usize);

/// For each Lesson, enumerate every candidate tuple allowed by the static
/// constraints (capacity, qualification). Index `i` of the returned `Vec`
/// is `domain(lesson i)`.
pub fn build_domains(problem: &Problem) -> Vec<Vec<Candidate>> {
    let slots: Vec<Slot> = all_slots();

    problem
        .lessons
        .iter()
        .map(|lesson| {
            let effective_size = problem.effective_size(lesson);
            let mut domain = Vec::new();

            for (slot_idx, _slot) in slots.iter().enumerate() {
                for (room_idx, room) in problem.instance.rooms.iter().enumerate() {
                    if room.capacity < effective_size {
                        continue;
                    }
                    for (instr_idx, instructor) in problem.instance.instructors.iter().enumerate() {
                        if !instructor.can_teach(&lesson.subject_id, lesson.kind) {
                            continue;
                        }
                        domain.push((slot_idx, room_idx, instr_idx));
                    }
                }
            }

            domain
        })
        .collect()
}

/// A lesson with no qualified instructor at all (independent of room/slot).
pub fn has_no_candidate_instructor(problem: &Problem, lesson_idx: usize) -> bool {
    let lesson = &problem.lessons[lesson_idx];
    !problem
        .instance
        .instructors
        .iter()
        .any(|i| i.can_teach(&lesson.subject_id, lesson.kind))
}

/// A lesson with no room of sufficient capacity at all.
pub fn has_no_suitable_room(problem: &Problem, lesson_idx: usize) -> bool {
    let lesson = &problem.lessons[lesson_idx];
    let effective_size = problem.effective_size(lesson);
    !problem.instance.rooms.iter().any(|r| r.capacity >= effective_size)
}
