use crate::{
    Comparator, CompileError, Field, Filter, GrouperFunction, MultiDateField, QueryLayoutOptions,
    Task, Top3DisplayMode, parse_query_show_hide_options,
};
use itertools::Itertools;
use rayon::prelude::*;
use std::{cmp::Ordering, collections::BTreeMap, fmt, time::Instant};
use tracing::{debug, info};

/// Fields consulted for filter lines, in priority order.
pub fn default_fields() -> Vec<Box<dyn Field>> {
    vec![Box::new(MultiDateField::top3())]
}

/// A line of a query document that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// 1-based.
    pub line_number: usize,
    pub error: CompileError,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.error)
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

pub struct Sorter {
    property: String,
    comparator: Comparator,
    reverse: bool,
}

impl Sorter {
    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let ordering = (self.comparator)(a, b);
        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

pub struct Grouper {
    property: String,
    grouper: GrouperFunction,
}

/// Tasks sharing the same headings, one heading per `group by` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGroup<'a> {
    pub headings: Vec<String>,
    pub tasks: Vec<&'a Task>,
}

/// A compiled query document.
///
/// ```
/// use task_query::{Query, Task, default_fields};
/// use jiff::civil::date;
///
/// let query = Query::parse("has top3 date\ngroup by top3", &default_fields()).unwrap();
/// let tasks = [
///     Task::new("read", vec![date(2024, 1, 1)]),
///     Task::new("write", vec![]),
/// ];
/// let groups = query.apply(&tasks);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].headings, ["Top3: 1 time"]);
/// ```
#[derive(Default)]
pub struct Query {
    filters: Vec<Filter>,
    sorters: Vec<Sorter>,
    groupers: Vec<Grouper>,
    layout_options: QueryLayoutOptions,
}

impl Query {
    /// Compiles every line of `source`; the first bad line aborts.
    pub fn parse(source: &str, fields: &[Box<dyn Field>]) -> Result<Self, QueryError> {
        let mut query = Query::default();
        for (index, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            query
                .parse_line(line, fields)
                .map_err(|error| QueryError {
                    line_number: index + 1,
                    error,
                })?;
        }
        debug!(
            "parsed query: {} filters, {} sorters, {} groupers",
            query.filters.len(),
            query.sorters.len(),
            query.groupers.len()
        );
        Ok(query)
    }

    fn parse_line(&mut self, line: &str, fields: &[Box<dyn Field>]) -> Result<(), CompileError> {
        let lowered = line.to_lowercase();
        match lowered.as_str() {
            "explain" => {
                self.layout_options.explain_query = true;
                return Ok(());
            }
            "short mode" | "short" => {
                self.layout_options.short_mode = true;
                return Ok(());
            }
            "full mode" | "full" => {
                self.layout_options.short_mode = false;
                return Ok(());
            }
            _ => {}
        }

        for (prefix, hide) in [("hide ", true), ("show ", false)] {
            if let Some(option) = lowered.strip_prefix(prefix) {
                if parse_query_show_hide_options(&mut self.layout_options, option, hide) {
                    return Ok(());
                }
                return Err(CompileError::new(line, "do not understand hide/show option"));
            }
        }

        if let Some(mode) = lowered.strip_prefix("top3 display ") {
            self.layout_options.top3_display_mode = mode
                .parse::<Top3DisplayMode>()
                .map_err(|message| CompileError::new(line, message))?;
            return Ok(());
        }

        if let Some(rest) = lowered.strip_prefix("sort by ") {
            return self.add_sorter(line, rest, fields);
        }

        if let Some(rest) = lowered.strip_prefix("group by ") {
            return self.add_grouper(line, rest.trim(), fields);
        }

        let Some(field) = fields.iter().find(|field| field.recognizes(line)) else {
            return Err(CompileError::new(line, "do not understand query"));
        };
        self.filters.push(field.compile(line)?);
        Ok(())
    }

    fn add_sorter(
        &mut self,
        line: &str,
        rest: &str,
        fields: &[Box<dyn Field>],
    ) -> Result<(), CompileError> {
        let mut words = rest.split_whitespace();
        let property = words.next().unwrap_or_default();
        let reverse = match words.next() {
            None => false,
            Some("reverse") if words.next().is_none() => true,
            Some(_) => return Err(CompileError::new(line, "do not understand query")),
        };
        let comparator = find_field(fields, property)
            .and_then(|field| field.comparator())
            .ok_or_else(|| {
                CompileError::new(line, format!("cannot sort by {property:?}"))
            })?;
        self.sorters.push(Sorter {
            property: property.to_string(),
            comparator,
            reverse,
        });
        Ok(())
    }

    fn add_grouper(
        &mut self,
        line: &str,
        property: &str,
        fields: &[Box<dyn Field>],
    ) -> Result<(), CompileError> {
        let grouper = find_field(fields, property)
            .and_then(|field| field.grouper())
            .ok_or_else(|| {
                CompileError::new(line, format!("cannot group by {property:?}"))
            })?;
        self.groupers.push(Grouper {
            property: property.to_string(),
            grouper,
        });
        Ok(())
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn layout_options(&self) -> &QueryLayoutOptions {
        &self.layout_options
    }

    /// Keeps the tasks every filter accepts, sorts them and splits them into
    /// groups ordered by heading.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<TaskGroup<'a>> {
        let started = Instant::now();
        let mut matched: Vec<&Task> = tasks
            .par_iter()
            .filter(|task| self.filters.iter().all(|filter| filter.matches(task)))
            .collect();
        matched.sort_by(|a, b| {
            self.sorters
                .iter()
                .map(|sorter| sorter.compare(a, b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        info!(
            "Query matched {} of {} tasks in {:?}",
            matched.len(),
            tasks.len(),
            started.elapsed()
        );

        if self.groupers.is_empty() {
            return vec![TaskGroup {
                headings: Vec::new(),
                tasks: matched,
            }];
        }

        let mut groups: BTreeMap<Vec<String>, Vec<&Task>> = BTreeMap::new();
        for task in matched {
            let headings = self
                .groupers
                .iter()
                .map(|grouper| {
                    let keys = (grouper.grouper)(task);
                    if keys.is_empty() {
                        vec![String::new()]
                    } else {
                        keys
                    }
                })
                .multi_cartesian_product();
            for heading in headings {
                groups.entry(heading).or_default().push(task);
            }
        }
        groups
            .into_iter()
            .map(|(headings, tasks)| TaskGroup { headings, tasks })
            .sorted_by(|a, b| compare_headings(&a.headings, &b.headings))
            .collect()
    }

    /// Every filter's explanation followed by the sort and group lines.
    pub fn explain(&self) -> String {
        let mut lines = Vec::new();
        if self.filters.is_empty() {
            lines.push("No filters supplied. All tasks will match the query.".to_string());
        }
        lines.extend(self.filters.iter().map(|filter| {
            let explanation = filter.explanation().to_string();
            if explanation == filter.line() {
                explanation
            } else {
                format!("{} =>\n{}", filter.line(), filter.explanation().render("  "))
            }
        }));
        lines.extend(self.sorters.iter().map(|sorter| {
            let suffix = if sorter.reverse { " reverse" } else { "" };
            format!("sort by {}{suffix}", sorter.property)
        }));
        lines.extend(
            self.groupers
                .iter()
                .map(|grouper| format!("group by {}", grouper.property)),
        );
        lines.join("\n\n")
    }
}

fn find_field<'f>(fields: &'f [Box<dyn Field>], property: &str) -> Option<&'f dyn Field> {
    fields
        .iter()
        .find(|field| field.field_name().eq_ignore_ascii_case(property))
        .map(|field| field.as_ref())
}

/// Orders heading paths level by level, with digit runs compared by value so
/// `Top3: 2 times` comes before `Top3: 10 times`.
fn compare_headings(a: &[String], b: &[String]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| natural_cmp(x, y))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        match (a.chars().next(), b.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let a_end = a.find(|c: char| !c.is_ascii_digit()).unwrap_or(a.len());
                let b_end = b.find(|c: char| !c.is_ascii_digit()).unwrap_or(b.len());
                let a_digits = a[..a_end].trim_start_matches('0');
                let b_digits = b[..b_end].trim_start_matches('0');
                let ordering = a_digits
                    .len()
                    .cmp(&b_digits.len())
                    .then_with(|| a_digits.cmp(b_digits));
                if ordering.is_ne() {
                    return ordering;
                }
                a = &a[a_end..];
                b = &b[b_end..];
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a = &a[x.len_utf8()..];
                b = &b[y.len_utf8()..];
            }
        }
    }
}
