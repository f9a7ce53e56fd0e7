use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

id_newtype!(RoomId);
id_newtype!(GroupId);
id_newtype!(InstructorId);
id_newtype!(SubjectId);

/// Dense, zero-based identifier for a generated [`Lesson`]. Lessons are
/// derived once from subjects+groups, so an integer index into the
/// generator's output is all a Lesson ever needs as identity.
pub type LessonId = u32;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

pub const DAYS: [Day; 5] = [
    Day::Monday,
    Day::Tuesday,
    Day::Wednesday,
    Day::Thursday,
    Day::Friday,
];

pub const PERIODS_PER_DAY: u8 = 4;

impl Day {
    pub fn index(self) -> usize {
        match self {
            Day::Monday => 0,
            Day::Tuesday => 1,
            Day::Wednesday => 2,
            Day::Thursday => 3,
            Day::Friday => 4,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        };
        f.write_str(s)
    }
}

/// A (day, period) pair. `period` is 1-indexed, 1..=[`PERIODS_PER_DAY`].
/// The fixed slot universe has `DAYS.len() * PERIODS_PER_DAY` = 20 elements;
/// see [`all_slots`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Slot {
    pub day: Day,
    pub period: u8,
}

impl Slot {
    pub fn new(day: Day, period: u8) -> Self {
        Self { day, period }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, period {}", self.day, self.period)
    }
}

/// All 20 slots in the fixed universe, ordered by (day_index, period).
pub fn all_slots() -> Vec<Slot> {
    let mut v = Vec::with_capacity(DAYS.len() * PERIODS_PER_DAY as usize);
    for &day in &DAYS {
        for period in 1..=PERIODS_PER_DAY {
            v.push(Slot::new(day, period));
        }
    }
    v
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    Lecture,
    Practical,
}

impl fmt::Display for LessonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LessonKind::Lecture => "Лекція",
            LessonKind::Practical => "Практика",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekType {
    #[default]
    Both,
    Even,
    Odd,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Room {
    pub id: RoomId,
    pub capacity: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Group {
    pub number: GroupId,
    pub size: u32,
    #[serde(default)]
    pub subgroups: Vec<String>,
}

impl Group {
    /// Size of a single subgroup, ⌈size / |subgroups|⌉. Falls back to the
    /// whole-group size when there are no subgroups.
    pub fn subgroup_size(&self) -> u32 {
        if self.subgroups.is_empty() {
            self.size
        } else {
            self.size.div_ceil(self.subgroups.len() as u32)
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Instructor {
    pub id: InstructorId,
    pub name: String,
    #[serde(default)]
    pub subjects_can_teach: Vec<SubjectId>,
    #[serde(default)]
    pub types_can_teach: Vec<LessonKind>,
    pub max_hours_per_week: u32,
}

impl Instructor {
    pub fn can_teach(&self, subject: &SubjectId, kind: LessonKind) -> bool {
        self.subjects_can_teach.contains(subject) && self.types_can_teach.contains(&kind)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub group_id: GroupId,
    pub num_lectures: u32,
    pub num_practicals: u32,
    #[serde(default)]
    pub requires_subgroups: bool,
    #[serde(default)]
    pub week_type: WeekType,
}

/// An atomic schedulable unit, derived once from a [`Subject`]'s lecture and
/// practical counts. Lessons are immutable after generation; solvers only
/// ever attach a `(Slot, RoomId, InstructorId)` tuple to a `LessonId`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Lesson {
    pub id: LessonId,
    pub subject_id: SubjectId,
    pub kind: LessonKind,
    pub group_id: GroupId,
    /// Present only for subgroup-split practicals.
    #[serde(default)]
    pub subgroup: Option<String>,
}

/// Wire-facing assignment of one lesson to a slot/room/instructor — the
/// shape that crosses the HTTP boundary and feeds the materializer.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
pub struct Assignment {
    pub lesson_id: LessonId,
    pub slot: Slot,
    pub room_id: RoomId,
    pub instructor_id: InstructorId,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct MaterializedLesson {
    pub slot: String,
    pub group: String,
    pub subject: String,
    pub kind: String,
    pub instructor: String,
    pub room_id: String,
    pub students: u32,
    pub capacity: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Timetable {
    /// Indexed by slot index (0..20, see [`all_slots`]).
    pub even: Vec<Vec<MaterializedLesson>>,
    pub odd: Vec<Vec<MaterializedLesson>>,
}

/// Full external-ingest input: typed entity collections, already parsed from
/// whatever upstream format (CSV, JSON, ...) by a collaborator outside this
/// workspace's scope.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct Instance {
    pub rooms: Vec<Room>,
    pub groups: Vec<Group>,
    pub instructors: Vec<Instructor>,
    pub subjects: Vec<Subject>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub enum SolverKind {
    Backtrack,
    Heuristic,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct SolveParams {
    pub solver: SolverKind,
    /// RNG seed for the population optimizer; ignored by the backtracking
    /// solver, which has no randomized behaviour.
    #[serde(default)]
    pub seed: u64,
    /// Per-instructor daily lesson cap. Defaults to 3; see DESIGN.md.
    #[serde(default = "default_daily_cap")]
    pub daily_cap: u32,
}

fn default_daily_cap() -> u32 {
    3
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct SolveEnvelope {
    pub instance: Instance,
    pub params: SolveParams,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct SolveResult {
    pub status: String,
    pub fitness: f64,
    pub assignments: Vec<Assignment>,
    pub stats: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_universe_has_twenty_elements() {
        assert_eq!(all_slots().len(), 20);
    }

    #[test]
    fn subgroup_size_rounds_up() {
        let g = Group {
            number: GroupId::from("G1"),
            size: 40,
            subgroups: vec!["A".into(), "B".into(), "C".into()],
        };
        assert_eq!(g.subgroup_size(), 14); // ceil(40/3)
    }

    #[test]
    fn subgroup_size_falls_back_without_subgroups() {
        let g = Group {
            number: GroupId::from("G1"),
            size: 30,
            subgroups: vec![],
        };
        assert_eq!(g.subgroup_size(), 30);
    }

    #[test]
    fn lesson_kind_display_is_ukrainian() {
        assert_eq!(LessonKind::Lecture.to_string(), "Лекція");
        assert_eq!(LessonKind::Practical.to_string(), "Практика");
    }
}
