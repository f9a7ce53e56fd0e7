pub mod constraints;
pub mod domain;
pub mod lessons;
pub mod materialize;
pub mod problem;
pub mod scoring;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use problem::Problem;
pub use types::{
    Assignment, Instance, LessonId, SolveEnvelope, SolveParams, SolveResult, SolverKind,
};

use domain::Candidate;
use types::all_slots;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid instance: {0}")]
    Msg(String),
}

#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("subject {subject_id} references missing group {group_id}")]
    UnknownGroup { subject_id: String, group_id: String },
    #[error("lesson {lesson_id} has no qualified instructor")]
    NoCandidateInstructor { lesson_id: LessonId },
    #[error("lesson {lesson_id} has no room of sufficient capacity")]
    NoSuitableRoom { lesson_id: LessonId },
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("no feasible assignment exists for this instance")]
    Infeasible,
    #[error("solve was cancelled")]
    Cancelled,
}

/// Cooperative cancellation flag shared between a job runner and a running
/// solver. Checked between variable expansions (backtracking) or between
/// generations (population optimizer); never forcibly aborts a thread.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Structural validation of an [`Instance`] ahead of lesson generation and
/// solving: unique ids, referential integrity, and schedulability of every
/// subject against the room/instructor pool as it stands.
pub fn validate(instance: &Instance) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    fn chk_unique<I: ToString>(name: &str, ids: impl Iterator<Item = I>, errors: &mut Vec<String>) {
        let mut seen = HashSet::new();
        for id in ids {
            let s = id.to_string();
            if !seen.insert(s.clone()) {
                errors.push(format!("duplicate {name} id: {s}"));
            }
        }
    }
    chk_unique("room", instance.rooms.iter().map(|r| &r.id), &mut errors);
    chk_unique("group", instance.groups.iter().map(|g| &g.number), &mut errors);
    chk_unique("instructor", instance.instructors.iter().map(|i| &i.id), &mut errors);
    chk_unique("subject", instance.subjects.iter().map(|s| &s.id), &mut errors);

    let groups: HashSet<_> = instance.groups.iter().map(|g| &g.number).collect();

    for room in &instance.rooms {
        if room.capacity == 0 {
            errors.push(format!("room {} has capacity 0", room.id));
        }
    }
    for group in &instance.groups {
        if group.size == 0 {
            errors.push(format!("group {} has size 0", group.number));
        }
    }
    for instructor in &instance.instructors {
        if instructor.max_hours_per_week == 0 {
            errors.push(format!(
                "instructor {} has max_hours_per_week 0",
                instructor.id
            ));
        }
    }

    for subject in &instance.subjects {
        if !groups.contains(&subject.group_id) {
            errors.push(
                ProblemError::UnknownGroup {
                    subject_id: subject.id.to_string(),
                    group_id: subject.group_id.to_string(),
                }
                .to_string(),
            );
            continue;
        }
        if subject.num_lectures == 0 && subject.num_practicals == 0 {
            errors.push(format!(
                "subject {} has no lectures or practicals",
                subject.id
            ));
        }
    }

    if errors.is_empty() {
        let problem = Problem::build(instance.clone());
        for lesson_idx in 0..problem.lessons.len() {
            let lesson_id = problem.lessons[lesson_idx].id;
            if domain::has_no_suitable_room(&problem, lesson_idx) {
                errors.push(ProblemError::NoSuitableRoom { lesson_id }.to_string());
            }
            if domain::has_no_candidate_instructor(&problem, lesson_idx) {
                errors.push(ProblemError::NoCandidateInstructor { lesson_id }.to_string());
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Msg(errors.join("; ")))
    }
}

/// Converts a full set of committed candidates into the wire-facing
/// [`Assignment`] list, skipping any lesson left unscheduled.
pub fn to_assignments(problem: &Problem, placements: &[Option<Candidate>]) -> Vec<Assignment> {
    let slots = all_slots();
    placements
        .iter()
        .enumerate()
        .filter_map(|(lesson_idx, placement)| {
            let (slot_idx, room_idx, instr_idx) = (*placement)?;
            let lesson = &problem.lessons[lesson_idx];
            Some(Assignment {
                lesson_id: lesson.id,
                slot: slots[slot_idx],
                room_id: problem.room(room_idx).id.clone(),
                instructor_id: problem.instructor(instr_idx).id.clone(),
            })
        })
        .collect()
}

/// Inverse of [`to_assignments`]: rebuilds a `Placements` vector from a
/// wire-facing `Assignment` list against a freshly-built `Problem`. An
/// assignment referencing a slot, room, instructor, or lesson id that no
/// longer resolves against `problem` is dropped rather than erroring, since
/// the caller has no way to recover a missing lesson anyway.
pub fn from_assignments(problem: &Problem, assignments: &[Assignment]) -> Vec<Option<Candidate>> {
    let slots = all_slots();
    let mut placements: Vec<Option<Candidate>> = vec![None; problem.lessons.len()];
    for assignment in assignments {
        let lesson_idx = assignment.lesson_id as usize;
        if lesson_idx >= placements.len() {
            continue;
        }
        let (Some(slot_idx), Some(room_idx), Some(instr_idx)) = (
            slots.iter().position(|s| *s == assignment.slot),
            problem.room_index(&assignment.room_id),
            problem.instructor_index(&assignment.instructor_id),
        ) else {
            continue;
        };
        placements[lesson_idx] = Some((slot_idx, room_idx, instr_idx));
    }
    placements
}

#[async_trait]
pub trait Solver: Send + Sync + 'static {
    async fn solve(&self, env: SolveEnvelope, cancel: &CancelToken) -> anyhow::Result<SolveResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Group, GroupId, Instructor, InstructorId, LessonKind, Room, RoomId, Subject, SubjectId, WeekType};

    fn valid_instance() -> Instance {
        Instance {
            rooms: vec![Room { id: RoomId::from("R1"), capacity: 40 }],
            groups: vec![Group { number: GroupId::from("G1"), size: 30, subgroups: vec![] }],
            instructors: vec![Instructor {
                id: InstructorId::from("I1"),
                name: "Ada".into(),
                subjects_can_teach: vec![SubjectId::from("S1")],
                types_can_teach: vec![LessonKind::Lecture],
                max_hours_per_week: 10,
            }],
            subjects: vec![Subject {
                id: SubjectId::from("S1"),
                name: "Algorithms".into(),
                group_id: GroupId::from("G1"),
                num_lectures: 1,
                num_practicals: 0,
                requires_subgroups: false,
                week_type: WeekType::Both,
            }],
        }
    }

    #[test]
    fn valid_instance_passes() {
        assert!(validate(&valid_instance()).is_ok());
    }

    #[test]
    fn duplicate_room_id_fails() {
        let mut instance = valid_instance();
        instance.rooms.push(Room { id: RoomId::from("R1"), capacity: 20 });
        assert!(validate(&instance).is_err());
    }

    #[test]
    fn subject_referencing_missing_group_fails() {
        let mut instance = valid_instance();
        instance.subjects[0].group_id = GroupId::from("GHOST");
        let err = validate(&instance).unwrap_err().to_string();
        assert!(err.contains("missing group"));
    }

    #[test]
    fn unschedulable_subject_fails() {
        let mut instance = valid_instance();
        instance.rooms[0].capacity = 5; // below group size
        let err = validate(&instance).unwrap_err().to_string();
        assert!(err.contains("no room of sufficient capacity"));
    }

    #[test]
    fn assignments_round_trip_through_placements() {
        let problem = Problem::build(valid_instance());
        let candidate: Candidate = (0, 0, 0);
        let placements = vec![Some(candidate)];
        let assignments = to_assignments(&problem, &placements);
        assert_eq!(assignments.len(), 1);

        let restored = from_assignments(&problem, &assignments);
        assert_eq!(restored, placements);
    }

    #[test]
    fn from_assignments_drops_unresolvable_entries() {
        let problem = Problem::build(valid_instance());
        let bogus = Assignment {
            lesson_id: 0,
            slot: all_slots()[0],
            room_id: RoomId::from("GHOST"),
            instructor_id: problem.instructor(0).id.clone(),
        };
        let restored = from_assignments(&problem, &[bogus]);
        assert_eq!(restored, vec![None]);
    }
}
