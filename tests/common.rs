#![allow(dead_code)]
//! Shared helpers for `task-query` integration tests.

use jiff::civil::{Date, date};
use task_query::*;

/// Wednesday 2024-03-13.
pub fn today() -> Date {
    date(2024, 3, 13)
}

pub fn field() -> MultiDateField {
    MultiDateField::top3().with_date_parser(DateParser::with_today(today()))
}

pub fn compile_ok(line: &str) -> Filter {
    field()
        .compile(line)
        .unwrap_or_else(|err| panic!("expected {line:?} to compile, got: {err}"))
}

pub fn compile_err(line: &str) -> CompileError {
    match field().compile(line) {
        Ok(filter) => panic!("expected {line:?} to fail, got: {filter:?}"),
        Err(err) => err,
    }
}

pub fn task_on(dates: &[(i16, i8, i8)]) -> Task {
    Task::new(
        "task",
        dates.iter().map(|&(y, m, d)| date(y, m, d)).collect(),
    )
}

pub fn undated() -> Task {
    Task::new("undated", vec![])
}

pub fn accepts(line: &str, task: &Task) -> bool {
    compile_ok(line).matches(task)
}
