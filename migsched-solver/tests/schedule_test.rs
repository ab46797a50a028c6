#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::run_solver;

/// Reads the number at the end of `line`, after `marker`.
fn number_after(line: &str, marker: &str) -> i32 {
    let (_, rest) = line
        .split_once(marker)
        .unwrap_or_else(|| panic!("'{line}' does not contain '{marker}'"));
    rest.split(|c: char| !c.is_ascii_digit())
        .next()
        .and_then(|digits| digits.parse().ok())
        .unwrap_or_else(|| panic!("no number after '{marker}' in '{line}'"))
}

fn find<'a>(schedule: &'a [String], prefix: &str) -> &'a str {
    schedule
        .iter()
        .find(|line| line.starts_with(prefix))
        .unwrap_or_else(|| panic!("no line starting with '{prefix}' in {schedule:?}"))
}

#[test]
fn every_swap_waits_for_the_departure() {
    let output = run_solver(
        "swap.json",
        &["--all-solutions", "--no-start-dominance"],
        "every_swap",
    );
    assert!(output.success);
    assert_eq!(Some("=========="), output.last_line());

    let schedules = output.schedules();
    assert_eq!(10, schedules.len());
    for schedule in schedules.iter() {
        let end = number_after(find(schedule, "old leaves"), " at ");
        let start = number_after(find(schedule, "new arrives"), " at ");
        assert!(start >= end, "overlapping schedule {schedule:?}");
    }
}

#[test]
fn first_swap_is_printed_alone() {
    let output = run_solver("swap.json", &[], "first_swap");
    assert!(output.success);
    assert_eq!(1, output.schedules().len());
    assert_eq!(Some("----------"), output.last_line());
}

#[test]
fn spent_conflict_limit_leaves_the_outcome_unknown() {
    let output = run_solver("swap.json", &["--conflict-limit", "0"], "conflict_limit");
    assert!(output.success);
    assert!(output.schedules().is_empty());
    assert_eq!(Some("=====UNKNOWN====="), output.last_line());
}

#[test]
fn overloaded_instance_has_no_schedule() {
    let output = run_solver("overloaded.json", &["--branching", "input-order-min"], "overloaded");
    assert!(output.success);
    assert!(output.schedules().is_empty());
    assert_eq!(Some("=====UNSATISFIABLE====="), output.last_line());
}

#[test]
fn relocation_keeps_the_arrivals_behind_the_departures() {
    let output = run_solver("relocation.json", &["--all-solutions"], "relocation");
    assert!(output.success);
    assert_eq!(Some("=========="), output.last_line());

    let schedules = output.schedules();
    assert!(!schedules.is_empty());
    for schedule in schedules.iter() {
        assert!(schedule.iter().any(|line| line == "web stays on node0"));

        let db = find(schedule, "db moves from node0 to node1");
        let cache = find(schedule, "cache arrives on");
        if cache.starts_with("cache arrives on node0") {
            assert!(number_after(cache, " at ") >= number_after(db, "leaving at "));
        }
    }
}

#[test]
fn unknown_resource_fails() {
    let output = run_solver("unknown_resource.json", &[], "unknown_resource");
    assert!(!output.success);
    assert!(output.schedules().is_empty());
}
