use types::{all_slots, MaterializedLesson, Timetable, WeekType};

use crate::domain::Candidate;
use crate::problem::Problem;

/// Projects a schedule onto the even/odd fortnight, per `Subject.week_type`.
/// Lessons with no committed candidate (`None`) are simply absent from the
/// output rather than treated as an error — callers that require a complete
/// schedule check `PartialAssignment::is_complete` beforehand.
pub fn materialize(problem: &Problem, placements: &[Option<Candidate>]) -> Timetable {
    let slots = all_slots();
    let mut timetable = Timetable {
        even: vec![Vec::new(); slots.len()],
        odd: vec![Vec::new(); slots.len()],
    };

    for (lesson_idx, placement) in placements.iter().enumerate() {
        let Some((slot_idx, room_idx, instr_idx)) = placement else { continue };
        let lesson = &problem.lessons[lesson_idx];
        let subject = problem.subject_of(lesson);
        let group = problem.group_of(lesson);
        let room = problem.room(*room_idx);
        let instructor = problem.instructor(*instr_idx);

        let group_label = match &lesson.subgroup {
            Some(sg) => format!("{} (Subgroup {sg})", group.number),
            None => group.number.to_string(),
        };

        let entry = MaterializedLesson {
            slot: slots[*slot_idx].to_string(),
            group: group_label,
            subject: subject.name.clone(),
            kind: lesson.kind.to_string(),
            instructor: instructor.name.clone(),
            room_id: room.id.to_string(),
            students: problem.effective_size(lesson),
            capacity: room.capacity,
        };

        match subject.week_type {
            WeekType::Both => {
                timetable.even[*slot_idx].push(entry.clone());
                timetable.odd[*slot_idx].push(entry);
            }
            WeekType::Even => timetable.even[*slot_idx].push(entry),
            WeekType::Odd => timetable.odd[*slot_idx].push(entry),
        }
    }

    timetable
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Day, Group, GroupId, Instance, Instructor, InstructorId, LessonKind, Room, RoomId, Slot, Subject, SubjectId};

    fn slot_idx(day: Day, period: u8) -> usize {
        all_slots().iter().position(|s| *s == Slot::new(day, period)).unwrap()
    }

    fn problem_with_week_type(week_type: WeekType) -> Problem {
        let instance = Instance {
            rooms: vec![Room { id: RoomId::from("R1"), capacity: 40 }],
            groups: vec![Group { number: GroupId::from("G1"), size: 30, subgroups: vec![] }],
            instructors: vec![Instructor {
                id: InstructorId::from("I1"),
                name: "Ada Lovelace".into(),
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
                week_type,
            }],
        };
        Problem::build(instance)
    }

    #[test]
    fn both_week_type_appears_in_even_and_odd() {
        let problem = problem_with_week_type(WeekType::Both);
        let mut placements = vec![None; problem.lessons.len()];
        let s = slot_idx(Day::Monday, 1);
        placements[0] = Some((s, 0, 0));
        let timetable = materialize(&problem, &placements);
        assert_eq!(timetable.even[s].len(), 1);
        assert_eq!(timetable.odd[s].len(), 1);
    }

    #[test]
    fn even_week_type_appears_only_in_even() {
        let problem = problem_with_week_type(WeekType::Even);
        let mut placements = vec![None; problem.lessons.len()];
        let s = slot_idx(Day::Monday, 1);
        placements[0] = Some((s, 0, 0));
        let timetable = materialize(&problem, &placements);
        assert_eq!(timetable.even[s].len(), 1);
        assert!(timetable.odd[s].is_empty());
    }

    #[test]
    fn unscheduled_lesson_produces_no_entry() {
        let problem = problem_with_week_type(WeekType::Both);
        let placements = vec![None; problem.lessons.len()];
        let timetable = materialize(&problem, &placements);
        assert!(timetable.even.iter().all(Vec::is_empty));
        assert!(timetable.odd.iter().all(Vec::is_empty));
    }

    #[test]
    fn subgroup_label_is_appended() {
        let mut instance = problem_with_week_type(WeekType::Both).instance;
        instance.groups[0].subgroups = vec!["A".into(), "B".into()];
        instance.subjects[0].requires_subgroups = true;
        instance.subjects[0].num_practicals = 1;
        let problem = Problem::build(instance);
        let practical_idx = problem
            .lessons
            .iter()
            .position(|l| l.kind == LessonKind::Practical && l.subgroup.as_deref() == Some("A"))
            .unwrap();
        let mut placements = vec![None; problem.lessons.len()];
        placements[practical_idx] = Some((slot_idx(Day::Monday, 1), 0, 0));
        let timetable = materialize(&problem, &placements);
        let entry = &timetable.even[slot_idx(Day::Monday, 1)][0];
        assert!(entry.group.contains("Subgroup A"));
    }
}
