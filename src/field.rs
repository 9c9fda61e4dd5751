use crate::{CompileError, Filter, Task};
use jiff::civil::Date;
use std::{cmp::Ordering, sync::Arc};

/// Orders two tasks for `sort by`.
pub type Comparator = Arc<dyn Fn(&Task, &Task) -> Ordering + Send + Sync>;

/// Produces the group headings a task belongs to for `group by`.
pub type GrouperFunction = Arc<dyn Fn(&Task) -> Vec<String> + Send + Sync>;

/// One attribute family of the query language.
///
/// Implementations own every line syntax for their attribute and must be
/// total: [`Field::compile`] reports failures as [`CompileError`] values and
/// never panics, whatever the input.
pub trait Field: Send + Sync {
    /// Keyword used by `sort by <name>` and `group by <name>`.
    fn field_name(&self) -> &str;

    /// Cheap syntactic check used to route a line to this field.
    fn recognizes(&self, line: &str) -> bool;

    fn compile(&self, line: &str) -> Result<Filter, CompileError>;

    /// `None` when the field cannot be sorted by.
    fn comparator(&self) -> Option<Comparator> {
        None
    }

    /// `None` when the field cannot be grouped by.
    fn grouper(&self) -> Option<GrouperFunction> {
        None
    }
}

/// Ascending by date; tasks without a date sort after every dated task.
pub fn compare_by_date(a: Option<Date>, b: Option<Date>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
