use std::collections::HashMap;

use types::{all_slots, InstructorId, LessonKind, Slot, WeekType};

use crate::domain::Candidate;
use crate::problem::Problem;

/// A schedule in progress: `placements[i]` is the committed tuple for
/// `problem.lessons[i]`, or `None` if that generated Lesson currently has no
/// slot. The backtracking solver only ever returns schedules where every
/// entry is `Some`; the population optimizer's individuals may carry `None`
/// entries (a Lesson dropped by mutation, or never placed by randomized
/// construction) — that's exactly what the count-deviation term penalizes.
pub type Placements = [Option<Candidate>];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FitnessReport {
    pub gaps_groups: i64,
    pub gaps_instructors: i64,
    pub workload_excess: i64,
    pub count_deviation: i64,
    pub penalty: f64,
    pub fitness: f64,
}

/// Computes the non-negative soft-constraint penalty and
/// `fitness = 1 / (1 + penalty)`. Pure and side-effect free.
pub fn evaluate(problem: &Problem, placements: &Placements) -> FitnessReport {
    let slots = all_slots();

    let gaps_groups = gap_penalty_groups(problem, placements, &slots);
    let gaps_instructors = gap_penalty_instructors(problem, placements, &slots);
    let workload_excess = workload_excess_penalty(problem, placements);
    let count_deviation = count_deviation_penalty(problem, placements);

    let penalty = (gaps_groups + gaps_instructors + workload_excess + count_deviation) as f64;
    let fitness = 1.0 / (1.0 + penalty);

    FitnessReport {
        gaps_groups,
        gaps_instructors,
        workload_excess,
        count_deviation,
        penalty,
        fitness,
    }
}

/// Group and instructor day-gap penalties share the same shape: bucket
/// committed lessons by (entity, day), sort periods, sum the holes. `key`
/// extracts the entity a committed lesson belongs to for a given pass.
fn day_gap_penalty<K: Eq + std::hash::Hash + Clone>(
    problem: &Problem,
    placements: &Placements,
    slots: &[Slot],
    key: impl Fn(usize, Candidate) -> K,
) -> i64 {
    let mut total = 0i64;
    for pass in [WeekType::Even, WeekType::Odd] {
        let mut by_entity_day: HashMap<(K, types::Day), Vec<u8>> = HashMap::new();
        for (lesson_idx, placement) in placements.iter().enumerate() {
            let Some(value) = placement else { continue };
            let lesson = &problem.lessons[lesson_idx];
            let subject = problem.subject_of(lesson);
            if !matches!(subject.week_type, WeekType::Both) && subject.week_type != pass {
                continue;
            }
            let slot = slots[value.0];
            by_entity_day
                .entry((key(lesson_idx, *value), slot.day))
                .or_default()
                .push(slot.period);
        }
        for periods in by_entity_day.values_mut() {
            periods.sort_unstable();
            for w in periods.windows(2) {
                total += (w[1] as i64 - w[0] as i64 - 1).max(0);
            }
        }
    }
    total
}

fn gap_penalty_groups(problem: &Problem, placements: &Placements, slots: &[Slot]) -> i64 {
    day_gap_penalty(problem, placements, slots, |lesson_idx, _value| {
        let lesson = &problem.lessons[lesson_idx];
        (lesson.group_id.clone(), lesson.subgroup.clone())
    })
}

fn gap_penalty_instructors(problem: &Problem, placements: &Placements, slots: &[Slot]) -> i64 {
    day_gap_penalty(problem, placements, slots, |_lesson_idx, value| {
        problem.instructor(value.2).id.clone()
    })
}

/// Σ 2 × (hours over cap) for every instructor, computed once over the full
/// set of scheduled lessons. An instructor's weekly load doesn't depend on
/// which parity a lesson's subject runs on.
fn workload_excess_penalty(problem: &Problem, placements: &Placements) -> i64 {
    let mut hours: HashMap<InstructorId, u32> = HashMap::new();
    for placement in placements {
        let Some((_, _, instr_idx)) = placement else { continue };
        *hours.entry(problem.instructor(*instr_idx).id.clone()).or_default() += 1;
    }
    let mut total = 0i64;
    for instructor in &problem.instance.instructors {
        let assigned = *hours.get(&instructor.id).unwrap_or(&0);
        if assigned > instructor.max_hours_per_week {
            total += 2 * (assigned - instructor.max_hours_per_week) as i64;
        }
    }
    total
}

/// Σ 2 × |scheduled − required| per subject, lectures and (per subgroup, or
/// a single pseudo-subgroup when none is used) practicals.
fn count_deviation_penalty(problem: &Problem, placements: &Placements) -> i64 {
    let mut lecture_counts: HashMap<types::SubjectId, u32> = HashMap::new();
    let mut practical_counts: HashMap<(types::SubjectId, Option<String>), u32> = HashMap::new();

    for (lesson_idx, placement) in placements.iter().enumerate() {
        if placement.is_none() {
            continue;
        }
        let lesson = &problem.lessons[lesson_idx];
        match lesson.kind {
            LessonKind::Lecture => {
                *lecture_counts.entry(lesson.subject_id.clone()).or_default() += 1;
            }
            LessonKind::Practical => {
                *practical_counts
                    .entry((lesson.subject_id.clone(), lesson.subgroup.clone()))
                    .or_default() += 1;
            }
        }
    }

    let mut total = 0i64;
    for subject in &problem.instance.subjects {
        let scheduled_lectures = *lecture_counts.get(&subject.id).unwrap_or(&0);
        total += 2 * (scheduled_lectures as i64 - subject.num_lectures as i64).abs();

        let group = problem.group_index(&subject.group_id).map(|i| problem.group(i));
        let subgroups: Vec<Option<String>> = match group {
            Some(g) if subject.requires_subgroups && !g.subgroups.is_empty() => {
                g.subgroups.iter().map(|s| Some(s.clone())).collect()
            }
            _ => vec![None],
        };
        for sg in subgroups {
            let scheduled = *practical_counts.get(&(subject.id.clone(), sg)).unwrap_or(&0);
            total += 2 * (scheduled as i64 - subject.num_practicals as i64).abs();
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Problem;
    use types::{Day, Group, GroupId, Instance, Instructor, InstructorId, LessonKind, Room, RoomId, Subject, SubjectId, WeekType};

    fn problem_one_group_one_subject() -> Problem {
        let instance = Instance {
            rooms: vec![Room { id: RoomId::from("R1"), capacity: 40 }],
            groups: vec![Group { number: GroupId::from("G1"), size: 30, subgroups: vec![] }],
            instructors: vec![Instructor {
                id: InstructorId::from("I1"),
                name: "Ada".into(),
                subjects_can_teach: vec![SubjectId::from("S1")],
                types_can_teach: vec![LessonKind::Lecture, LessonKind::Practical],
                max_hours_per_week: 10,
            }],
            subjects: vec![Subject {
                id: SubjectId::from("S1"),
                name: "Algorithms".into(),
                group_id: GroupId::from("G1"),
                num_lectures: 2,
                num_practicals: 0,
                requires_subgroups: false,
                week_type: WeekType::Both,
            }],
        };
        Problem::build(instance)
    }

    fn slot_idx(day: Day, period: u8) -> usize {
        all_slots().iter().position(|s| *s == Slot::new(day, period)).unwrap()
    }

    #[test]
    fn zero_penalty_is_fitness_one() {
        let problem = problem_one_group_one_subject();
        let mut placements: Vec<Option<Candidate>> = vec![None; problem.lessons.len()];
        placements[0] = Some((slot_idx(Day::Monday, 1), 0, 0));
        placements[1] = Some((slot_idx(Day::Tuesday, 1), 0, 0));
        let report = evaluate(&problem, &placements);
        assert_eq!(report.penalty, 0.0);
        assert_eq!(report.fitness, 1.0);
    }

    #[test]
    fn gap_increases_penalty_and_lowers_fitness() {
        let problem = problem_one_group_one_subject();
        let mut gappy: Vec<Option<Candidate>> = vec![None; problem.lessons.len()];
        gappy[0] = Some((slot_idx(Day::Monday, 1), 0, 0));
        gappy[1] = Some((slot_idx(Day::Monday, 3), 0, 0));

        let mut tight: Vec<Option<Candidate>> = vec![None; problem.lessons.len()];
        tight[0] = Some((slot_idx(Day::Monday, 1), 0, 0));
        tight[1] = Some((slot_idx(Day::Monday, 2), 0, 0));

        let gappy_report = evaluate(&problem, &gappy);
        let tight_report = evaluate(&problem, &tight);
        assert!(gappy_report.penalty > tight_report.penalty);
        assert!(tight_report.fitness > gappy_report.fitness);
    }

    #[test]
    fn unscheduled_lesson_is_penalized_via_count_deviation() {
        let problem = problem_one_group_one_subject();
        let mut placements: Vec<Option<Candidate>> = vec![None; problem.lessons.len()];
        placements[0] = Some((slot_idx(Day::Monday, 1), 0, 0));
        let report = evaluate(&problem, &placements);
        assert_eq!(report.count_deviation, 2);
    }

    #[test]
    fn fitness_is_deterministic() {
        let problem = problem_one_group_one_subject();
        let mut placements: Vec<Option<Candidate>> = vec![None; problem.lessons.len()];
        placements[0] = Some((slot_idx(Day::Monday, 1), 0, 0));
        placements[1] = Some((slot_idx(Day::Monday, 3), 0, 0));
        let a = evaluate(&problem, &placements);
        let b = evaluate(&problem, &placements);
        assert_eq!(a, b);
    }
}
