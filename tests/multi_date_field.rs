mod common;
use common::*;
use jiff::civil::date;
use std::cmp::Ordering;
use task_query::*;

#[test]
fn recognizes_only_its_own_lines() {
    let field = field();
    for line in [
        "has top3 date",
        "NO TOP3 DATE",
        "top3 count > 2",
        "top3 before today",
        "top3 not-a-date",
    ] {
        assert!(field.recognizes(line), "{line}");
    }
    for line in ["", "top3", "due before today", "has due date", "top3count > 2"] {
        assert!(!field.recognizes(line), "{line}");
    }
}

#[test]
fn exact_phrases_are_complements() {
    let tasks = [undated(), task_on(&[(2024, 1, 1)]), task_on(&[(2024, 1, 1), (2024, 2, 1)])];
    let has = compile_ok("has top3 date");
    let no = compile_ok("no top3 date");
    assert!(!has.matches(&tasks[0]));
    assert!(has.matches(&tasks[1]));
    for task in &tasks {
        assert_ne!(has.matches(task), no.matches(task));
    }
    assert_eq!(has.explanation().to_string(), "has top3 date");
}

#[test]
fn single_day_round_trip() {
    let task = task_on(&[(2024, 1, 15)]);
    assert!(accepts("top3 on 2024-01-15", &task));
    assert!(accepts("top3 2024-01-15", &task));
    assert!(accepts("top3 in 2024-01-15", &task));
    assert!(!accepts("top3 before 2024-01-15", &task));
    assert!(!accepts("top3 after 2024-01-15", &task));
    assert!(accepts("top3 on or before 2024-01-15", &task));
    assert!(accepts("top3 in or after 2024-01-15", &task));
}

#[test]
fn range_is_inclusive() {
    let filter = compile_ok("top3 2024-01-01 to 2024-01-31");
    for (day, expected) in [
        ((2024, 1, 15), true),
        ((2024, 1, 1), true),
        ((2024, 1, 31), true),
        ((2023, 12, 31), false),
        ((2024, 2, 1), false),
    ] {
        assert_eq!(filter.matches(&task_on(&[day])), expected, "{day:?}");
    }
}

#[test]
fn only_the_latest_date_counts() {
    let task = task_on(&[(2023, 6, 1), (2024, 1, 20), (2023, 12, 1)]);
    assert!(accepts("top3 in 2024-01", &task));
    assert!(!accepts("top3 in 2023", &task));
    assert!(accepts("top3 after 2024-01-19", &task));
    assert!(!accepts("top3 before 2024-01-01", &task));
}

#[test]
fn relations_against_ranges() {
    let before_start = task_on(&[(2023, 12, 31)]);
    let at_start = task_on(&[(2024, 1, 1)]);
    let at_end = task_on(&[(2024, 1, 31)]);
    let after_end = task_on(&[(2024, 2, 1)]);

    let range = "2024-01-01 to 2024-01-31";
    assert!(accepts(&format!("top3 before {range}"), &before_start));
    assert!(!accepts(&format!("top3 before {range}"), &at_start));
    assert!(accepts(&format!("top3 after {range}"), &after_end));
    assert!(!accepts(&format!("top3 after {range}"), &at_end));
    assert!(accepts(&format!("top3 on or before {range}"), &at_end));
    assert!(!accepts(&format!("top3 on or before {range}"), &after_end));
    assert!(accepts(&format!("top3 on or after {range}"), &at_start));
    assert!(!accepts(&format!("top3 in or after {range}"), &before_start));
}

#[test]
fn relative_dates_use_the_parser_today() {
    let task = task_on(&[(2024, 3, 12)]);
    assert!(accepts("top3 yesterday", &task));
    assert!(accepts("top3 this week", &task));
    assert!(accepts("top3 before today", &task));
    assert!(!accepts("top3 before last week", &task));
    assert!(accepts("top3 after last week", &task));
}

#[test]
fn tasks_without_dates_never_match_dates() {
    for line in [
        "top3 on 2024-01-15",
        "top3 before 2030-01-01",
        "top3 after 2000-01-01",
        "top3 on or before 2030-01-01",
        "top3 on or after 2000-01-01",
        "top3 2000-01-01 to 2030-01-01",
    ] {
        assert!(!accepts(line, &undated()), "{line}");
    }
}

#[test]
fn count_grammar() {
    let two = task_on(&[(2024, 1, 1), (2024, 1, 2)]);
    let three = task_on(&[(2024, 1, 1), (2024, 1, 2), (2024, 1, 3)]);
    assert!(accepts("top3 count > 2", &three));
    assert!(!accepts("top3 count > 2", &two));
    assert!(accepts("top3 count is 0", &undated()));
    assert!(accepts("top3 count=0", &undated()));
    assert!(accepts("TOP3 COUNT >= 2", &two));
    assert!(accepts("top3 count <= 2", &two));
    assert!(!accepts("top3 count < 2", &two));
}

#[test]
fn count_grammar_trusts_the_stored_count() {
    let task = task_on(&[(2024, 1, 1)]).with_top3_count(5);
    assert!(accepts("top3 count = 5", &task));
    assert!(!accepts("top3 count = 1", &task));
}

#[test]
fn count_explanations() {
    for (line, expected) in [
        ("top3 count > 2", "top3 count is greater than 2"),
        ("top3 count >= 2", "top3 count is at least 2"),
        ("top3 count < 2", "top3 count is less than 2"),
        ("top3 count <= 2", "top3 count is at most 2"),
        ("top3 count = 2", "top3 count is exactly 2"),
        ("top3 count is 2", "top3 count is exactly 2"),
    ] {
        assert_eq!(compile_ok(line).explanation().to_string(), expected);
    }
}

#[test]
fn date_explanations() {
    let cases = [
        (
            "top3 before 2024-01-15",
            "top3 date is before 2024-01-15 (Monday 15th January 2024)",
        ),
        (
            "top3 after 2024-01-15",
            "top3 date is after 2024-01-15 (Monday 15th January 2024)",
        ),
        (
            "top3 in or before 2024-01-15",
            "top3 date is on or before 2024-01-15 (Monday 15th January 2024)",
        ),
        (
            "top3 in or after 2024-01-15",
            "top3 date is on or after 2024-01-15 (Monday 15th January 2024)",
        ),
        (
            "top3 2024-01-15",
            "top3 date is on 2024-01-15 (Monday 15th January 2024)",
        ),
        (
            "top3 before 2024-01-01 to 2024-01-31",
            "top3 date is before 2024-01-01 (Monday 1st January 2024)",
        ),
        (
            "top3 after 2024-01-01 to 2024-01-31",
            "top3 date is after 2024-01-31 (Wednesday 31st January 2024)",
        ),
    ];
    for (line, expected) in cases {
        assert_eq!(compile_ok(line).explanation().to_string(), expected, "{line}");
    }
}

#[test]
fn range_explanation_is_a_tree() {
    let filter = compile_ok("top3 in 2024-01-01 to 2024-01-31");
    let explanation = filter.explanation();
    assert_eq!(explanation.description(), "top3 date is between:");
    let children: Vec<_> = explanation
        .children()
        .iter()
        .map(|child| child.description())
        .collect();
    assert_eq!(
        children,
        [
            "2024-01-01 (Monday 1st January 2024) and",
            "2024-01-31 (Wednesday 31st January 2024) inclusive",
        ]
    );
}

#[test]
fn malformed_lines_are_errors() {
    assert_eq!(compile_err("top3 not-a-date").message, "do not understand top3 date");
    assert_eq!(compile_err("top3 ").message, "do not understand top3 date");
    assert_eq!(compile_err("top3 before soon").message, "do not understand top3 date");
    assert_eq!(compile_err("top3 count > many").message, "do not understand top3 date");
    assert_eq!(
        compile_err("top3 count > 99999999999999999999999").message,
        "do not understand top3 count"
    );
}

#[test]
fn only_a_relation_keyword_may_precede_the_date() {
    for line in [
        "top3 not in 2024",
        "top3 not 2024",
        "top3 xyzzy 2024-01-01 to 2024-01-31",
        "top3 except last month",
        "top3 onward 2024",
    ] {
        let err = compile_err(line);
        assert_eq!(err.line, line);
        assert_eq!(err.message, "do not understand top3 date");
    }

    let task = task_on(&[(2024, 6, 1)]);
    assert!(accepts("top3 in 2024", &task));
    assert!(accepts("top3 on or after last month", &task));
    assert!(!accepts("top3 before 2024", &task));
}

#[test]
fn unowned_lines_name_the_field() {
    for line in ["", "top3", "has top3 dates", "due today"] {
        let err = compile_err(line);
        assert_eq!(err.line, line);
        assert_eq!(err.message, "do not understand query filter (top3 date)");
    }
}

#[test]
fn compiling_twice_gives_the_same_behavior() {
    let tasks = [
        undated(),
        task_on(&[(2024, 1, 1)]),
        task_on(&[(2024, 1, 31), (2023, 1, 1)]),
        task_on(&[(2024, 3, 1)]),
    ];
    for line in ["top3 in 2024-01", "top3 count >= 1", "no top3 date", "top3 after 2024-01-01"] {
        let first = compile_ok(line);
        let second = compile_ok(line);
        for task in &tasks {
            assert_eq!(first.matches(task), second.matches(task), "{line}");
        }
        assert_eq!(first.explanation(), second.explanation());
    }
}

#[test]
fn comparator_orders_by_latest_date_with_undated_last() {
    let field = field();
    let comparator = field.comparator().expect("top3 supports sorting");
    let mut tasks = vec![
        undated(),
        task_on(&[(2024, 5, 1), (2023, 1, 1)]),
        task_on(&[(2024, 1, 1)]),
        undated(),
        task_on(&[(2024, 3, 1), (2024, 2, 1)]),
    ];
    tasks.sort_by(|a, b| comparator(a, b));
    let latest: Vec<_> = tasks.iter().map(|task| latest_date(&task.top3_dates)).collect();
    let mut expected = latest.clone();
    expected.sort_by(|a, b| compare_by_date(*a, *b));
    assert_eq!(latest, expected);
    assert_eq!(latest[0], Some(date(2024, 1, 1)));
    assert_eq!(latest[3], None);
    assert_eq!(latest[4], None);

    let dated = task_on(&[(2024, 1, 1)]);
    assert_eq!(comparator(&dated, &undated()), Ordering::Less);
    assert_eq!(comparator(&undated(), &dated), Ordering::Greater);
}

#[test]
fn grouper_counts_dates() {
    let field = field();
    let grouper = field.grouper().expect("top3 supports grouping");
    assert_eq!(grouper(&undated()), ["No top3 dates"]);
    assert_eq!(grouper(&task_on(&[(2024, 1, 1)])), ["Top3: 1 time"]);
    assert_eq!(
        grouper(&task_on(&[(2024, 1, 1), (2024, 1, 2)])),
        ["Top3: 2 times"]
    );
    // derived from the dates, not the stored count
    assert_eq!(
        grouper(&task_on(&[(2024, 1, 1)]).with_top3_count(4)),
        ["Top3: 1 time"]
    );
}

#[test]
fn other_fields_reuse_the_grammar() {
    fn dates(task: &Task) -> &[jiff::civil::Date] {
        &task.top3_dates
    }
    fn count(task: &Task) -> usize {
        task.top3_count
    }
    let field = MultiDateField::new("done", dates, count);
    assert_eq!(field.field_name(), "done");
    assert!(field.compile("has done date").unwrap().matches(&task_on(&[(2024, 1, 1)])));
    assert!(field.compile("done count is 1").is_ok());
    assert!(field.compile("top3 count is 1").is_err());
    let grouper = field.grouper().unwrap();
    assert_eq!(grouper(&undated()), ["No done dates"]);
    assert_eq!(grouper(&task_on(&[(2024, 1, 1)])), ["Done: 1 time"]);
}
