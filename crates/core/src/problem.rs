use std::collections::HashMap;
use types::{Group, GroupId, Instance, Instructor, InstructorId, Lesson, Room, RoomId, Subject, SubjectId};

use crate::lessons;

/// An explicit, immutable problem value passed into the solvers instead of
/// process-wide singletons. Entities are kept in flat `Vec`s; cross-references
/// are resolved to dense integer indices once here rather than re-hashed by
/// string id on every lookup.
pub struct Problem {
    pub instance: Instance,
    pub lessons: Vec<Lesson>,
    /// Non-fatal issues surfaced during generation (e.g. `UnknownGroup`).
    pub warnings: Vec<String>,
    room_idx: HashMap<RoomId, usize>,
    instructor_idx: HashMap<InstructorId, usize>,
    group_idx: HashMap<GroupId, usize>,
    subject_idx: HashMap<SubjectId, usize>,
}

impl Problem {
    pub fn build(instance: Instance) -> Problem {
        let room_idx = instance
            .rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        let instructor_idx = instance
            .instructors
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        let group_idx = instance
            .groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.number.clone(), i))
            .collect();
        let subject_idx = instance
            .subjects
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();

        let (lessons, warnings) = lessons::generate(&instance.subjects, &instance.groups);

        Problem {
            instance,
            lessons,
            warnings,
            room_idx,
            instructor_idx,
            group_idx,
            subject_idx,
        }
    }

    pub fn room(&self, idx: usize) -> &Room {
        &self.instance.rooms[idx]
    }
    pub fn instructor(&self, idx: usize) -> &Instructor {
        &self.instance.instructors[idx]
    }
    pub fn group(&self, idx: usize) -> &Group {
        &self.instance.groups[idx]
    }
    pub fn subject(&self, idx: usize) -> &Subject {
        &self.instance.subjects[idx]
    }

    pub fn room_index(&self, id: &RoomId) -> Option<usize> {
        self.room_idx.get(id).copied()
    }
    pub fn instructor_index(&self, id: &InstructorId) -> Option<usize> {
        self.instructor_idx.get(id).copied()
    }
    pub fn group_index(&self, id: &GroupId) -> Option<usize> {
        self.group_idx.get(id).copied()
    }
    pub fn subject_index(&self, id: &SubjectId) -> Option<usize> {
        self.subject_idx.get(id).copied()
    }

    pub fn group_of(&self, lesson: &Lesson) -> &Group {
        let gi = self.group_index(&lesson.group_id).expect("lesson references known group");
        self.group(gi)
    }
    pub fn subject_of(&self, lesson: &Lesson) -> &Subject {
        let si = self.subject_index(&lesson.subject_id).expect("lesson references known subject");
        self.subject(si)
    }

    /// ⌈group.size / |subgroups|⌉ if the lesson carries a subgroup, else the
    /// whole group size.
    pub fn effective_size(&self, lesson: &Lesson) -> u32 {
        let group = self.group_of(lesson);
        if lesson.subgroup.is_some() {
            group.subgroup_size()
        } else {
            group.size
        }
    }
}
