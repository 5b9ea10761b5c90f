mod common;

use common::{date, init_tracing};
use taskshift::dag::{DependencyIndex, compute_shift, compute_shift_with_index};
use taskshift_test_utils::builders::{SnapshotBuilder, TaskBuilder};

#[test]
fn chain_shift_moves_every_descendant_by_delta() {
    init_tracing();
    // A <- B <- C
    let snap = SnapshotBuilder::new()
        .task("A", "2024-01-01")
        .task_after("B", "2024-01-04", &["A"])
        .task_after("C", "2024-01-08", &["B"])
        .build();

    let plan = compute_shift(&snap, "A", date("2024-01-03")).unwrap();

    assert_eq!(plan.delta(), 2);
    let moves: Vec<(&str, _)> = plan.iter().collect();
    assert_eq!(
        moves,
        vec![
            ("A", date("2024-01-03")),
            ("B", date("2024-01-06")),
            ("C", date("2024-01-10")),
        ]
    );
}

#[test]
fn diamond_join_appears_once() {
    init_tracing();
    //   A
    //  / \
    // B   C
    //  \ /
    //   D
    let snap = SnapshotBuilder::new()
        .task("A", "2024-01-01")
        .task_after("B", "2024-01-02", &["A"])
        .task_after("C", "2024-01-05", &["A"])
        .task_after("D", "2024-01-09", &["B", "C"])
        .build();

    let plan = compute_shift(&snap, "A", date("2024-01-02")).unwrap();

    assert_eq!(plan.len(), 4);
    assert_eq!(plan.get("A"), Some(date("2024-01-02")));
    assert_eq!(plan.get("B"), Some(date("2024-01-03")));
    assert_eq!(plan.get("C"), Some(date("2024-01-06")));
    assert_eq!(plan.get("D"), Some(date("2024-01-10")));
}

#[test]
fn unknown_task_gives_empty_plan() {
    init_tracing();
    let snap = SnapshotBuilder::new().task("A", "2024-01-01").build();
    assert!(compute_shift(&snap, "Z", date("2024-01-05")).unwrap().is_empty());
}

#[test]
fn same_day_gives_empty_plan() {
    init_tracing();
    let snap = SnapshotBuilder::new()
        .task("A", "2024-01-01")
        .task_after("B", "2024-01-02", &["A"])
        .build();
    assert!(compute_shift(&snap, "A", date("2024-01-01")).unwrap().is_empty());
}

#[test]
fn two_task_cycle_terminates() {
    init_tracing();
    let snap = SnapshotBuilder::new()
        .task_after("A", "2024-01-01", &["B"])
        .task_after("B", "2024-01-03", &["A"])
        .build();

    let plan = compute_shift(&snap, "A", date("2024-01-02")).unwrap();

    assert_eq!(plan.len(), 2);
    assert_eq!(plan.get("A"), Some(date("2024-01-02")));
    assert_eq!(plan.get("B"), Some(date("2024-01-04")));
}

#[test]
fn long_cycle_with_tail_terminates() {
    init_tracing();
    // A -> B -> C -> A, plus D hanging off C.
    let snap = SnapshotBuilder::new()
        .task_after("A", "2024-03-01", &["C"])
        .task_after("B", "2024-03-02", &["A"])
        .task_after("C", "2024-03-03", &["B"])
        .task_after("D", "2024-03-04", &["C"])
        .task("E", "2024-03-05")
        .build();

    let index = DependencyIndex::build(&snap);
    let plan = compute_shift_with_index(&snap, &index, "B", date("2024-02-29")).unwrap();

    assert_eq!(plan.delta(), -2);
    assert_eq!(plan.len(), 4);
    assert_eq!(plan.get("C"), Some(date("2024-03-01")));
    assert_eq!(plan.get("A"), Some(date("2024-02-28")));
    assert_eq!(plan.get("D"), Some(date("2024-03-02")));
    assert!(!plan.contains("E"));
    assert_eq!(
        index.cycles(),
        vec![vec!["A".to_string(), "B".to_string(), "C".to_string()]]
    );
}

#[test]
fn dependents_may_overlap_parents_after_shift() {
    init_tracing();
    // B starts the day after A; A lasts 5 days. Moving A does not push B past
    // A's finish, it only keeps B's offset.
    let snap = SnapshotBuilder::new()
        .with_task(TaskBuilder::new("A", "2024-01-01").duration(5).build())
        .task_after("B", "2024-01-02", &["A"])
        .build();

    let plan = compute_shift(&snap, "A", date("2024-01-11")).unwrap();

    assert_eq!(plan.get("B"), Some(date("2024-01-12")));
}

#[test]
fn applying_twice_is_idempotent() {
    init_tracing();
    let snap = SnapshotBuilder::new()
        .task("A", "2024-01-01")
        .task_after("B", "2024-01-02", &["A"])
        .task_after("C", "2024-01-03", &["A"])
        .build();

    let first = compute_shift(&snap, "A", date("2023-12-25")).unwrap();
    let shifted = first.apply_to(&snap);
    let second = compute_shift(&shifted, "A", date("2023-12-25")).unwrap();

    assert_eq!(first.len(), 3);
    assert!(second.is_empty());
}
