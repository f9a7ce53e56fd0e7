use types::{Group, Lesson, LessonKind, Subject};

/// Expands subjects into atomic [`Lesson`] instances per cohort/subgroup.
/// Deterministic given input order: ids are assigned densely,
/// in the order subjects are iterated and, within a subject, lectures before
/// practicals, subgroups in the order the owning group lists them.
///
/// A subject referencing a missing group is skipped with a warning rather
/// than aborting generation (`UnknownGroup` policy).
pub fn generate(subjects: &[Subject], groups: &[Group]) -> (Vec<Lesson>, Vec<String>) {
    let mut lessons = Vec::new();
    let mut warnings = Vec::new();
    let mut next_id: u32 = 0;

    for subject in subjects {
        let Some(group) = groups.iter().find(|g| g.number == subject.group_id) else {
            warnings.push(format!(
                "UnknownGroup: subject {} references missing group {}",
                subject.id, subject.group_id
            ));
            continue;
        };

        for _ in 0..subject.num_lectures {
            lessons.push(Lesson {
                id: next_id,
                subject_id: subject.id.clone(),
                kind: LessonKind::Lecture,
                group_id: group.number.clone(),
                subgroup: None,
            });
            next_id += 1;
        }

        if subject.requires_subgroups && !group.subgroups.is_empty() {
            let per_subgroup = subject.num_practicals.div_ceil(group.subgroups.len() as u32);
            for subgroup in &group.subgroups {
                for _ in 0..per_subgroup {
                    lessons.push(Lesson {
                        id: next_id,
                        subject_id: subject.id.clone(),
                        kind: LessonKind::Practical,
                        group_id: group.number.clone(),
                        subgroup: Some(subgroup.clone()),
                    });
                    next_id += 1;
                }
            }
        } else {
            for _ in 0..subject.num_practicals {
                lessons.push(Lesson {
                    id: next_id,
                    subject_id: subject.id.clone(),
                    kind: LessonKind::Practical,
                    group_id: group.number.clone(),
                    subgroup: None,
                });
                next_id += 1;
            }
        }
    }

    (lessons, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use types::{GroupId, SubjectId, WeekType};

    fn group(number: &str, size: u32, subgroups: Vec<&str>) -> Group {
        Group {
            number: GroupId::from(number),
            size,
            subgroups: subgroups.into_iter().map(String::from).collect(),
        }
    }

    fn subject(
        id: &str,
        group_id: &str,
        num_lectures: u32,
        num_practicals: u32,
        requires_subgroups: bool,
    ) -> Subject {
        Subject {
            id: SubjectId::from(id),
            name: id.to_string(),
            group_id: GroupId::from(group_id),
            num_lectures,
            num_practicals,
            requires_subgroups,
            week_type: WeekType::Both,
        }
    }

    #[test]
    fn dense_ids_and_counts_without_subgroups() {
        let groups = vec![group("G1", 30, vec![])];
        let subjects = vec![subject("S1", "G1", 1, 1, false)];
        let (lessons, warnings) = generate(&subjects, &groups);
        assert!(warnings.is_empty());
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].id, 0);
        assert_eq!(lessons[1].id, 1);
        assert_eq!(lessons[0].kind, LessonKind::Lecture);
        assert_eq!(lessons[1].kind, LessonKind::Practical);
        assert!(lessons.iter().all(|l| l.subgroup.is_none()));
    }

    #[test]
    fn subgroup_split_may_overshoot_by_k_minus_one() {
        // num_practicals=3, 2 subgroups => ceil(3/2)=2 per subgroup, 4 total.
        let groups = vec![group("G1", 40, vec!["A", "B"])];
        let subjects = vec![subject("S1", "G1", 0, 3, true)];
        let (lessons, _) = generate(&subjects, &groups);
        assert_eq!(lessons.len(), 4);
        let a: Vec<_> = lessons.iter().filter(|l| l.subgroup.as_deref() == Some("A")).collect();
        let b: Vec<_> = lessons.iter().filter(|l| l.subgroup.as_deref() == Some("B")).collect();
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn requires_subgroups_falls_back_to_whole_group_without_subgroups() {
        let groups = vec![group("G1", 40, vec![])];
        let subjects = vec![subject("S1", "G1", 0, 3, true)];
        let (lessons, _) = generate(&subjects, &groups);
        assert_eq!(lessons.len(), 3);
        assert!(lessons.iter().all(|l| l.subgroup.is_none()));
    }

    #[test]
    fn unknown_group_is_skipped_with_warning() {
        let groups = vec![group("G1", 30, vec![])];
        let subjects = vec![subject("S1", "GHOST", 1, 1, false)];
        let (lessons, warnings) = generate(&subjects, &groups);
        assert!(lessons.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("UnknownGroup"));
    }

    #[test]
    fn generation_is_deterministic() {
        let groups = vec![group("G1", 30, vec!["A", "B"])];
        let subjects = vec![
            subject("S1", "G1", 2, 2, true),
            subject("S2", "G1", 1, 0, false),
        ];
        let (a, _) = generate(&subjects, &groups);
        let (b, _) = generate(&subjects, &groups);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.subject_id, y.subject_id);
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.subgroup, y.subgroup);
        }
    }

    proptest! {
        #[test]
        fn generation_is_a_pure_function_of_its_inputs(
            num_lectures in 0u32..4,
            num_practicals in 0u32..4,
            requires_subgroups in any::<bool>(),
            group_size in 1u32..60,
            subgroup_count in 0usize..3,
        ) {
            let subgroups: Vec<String> = (0..subgroup_count).map(|i| format!("SG{i}")).collect();
            let groups = vec![Group {
                number: types::GroupId::from("G1"),
                size: group_size,
                subgroups,
            }];
            let subjects = vec![subject(
                "S1", "G1", num_lectures, num_practicals, requires_subgroups,
            )];

            let (a, warnings_a) = generate(&subjects, &groups);
            let (b, warnings_b) = generate(&subjects, &groups);

            prop_assert_eq!(warnings_a, warnings_b);
            prop_assert_eq!(a.len(), b.len());
            for (x, y) in a.iter().zip(b.iter()) {
                prop_assert_eq!(x.id, y.id);
                prop_assert_eq!(&x.subject_id, &y.subject_id);
                prop_assert_eq!(x.kind, y.kind);
                prop_assert_eq!(&x.subgroup, &y.subgroup);
            }
        }
    }
}
