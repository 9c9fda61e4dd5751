use crate::{
    Comparator, CompileError, Explanation, Field, Filter, FilterInstructions, GrouperFunction,
    Task, compare_by_date,
};
use date_parser::{DateParser, DateRange};
use jiff::civil::Date;
use regex::{Captures, Regex};
use std::sync::Arc;
use tracing::debug;

/// Reads the dates of one attribute family from a task.
pub type DatesAccessor = fn(&Task) -> &[Date];

/// Reads the stored count of one attribute family from a task.
pub type CountAccessor = fn(&Task) -> usize;

/// Result of offering a line to one grammar: `None` means the grammar does
/// not own the line and the next one should be tried.
type GrammarOutcome = Option<Result<Filter, CompileError>>;

type Grammar = fn(&MultiDateField, &str) -> GrammarOutcome;

/// Filter, sort and group support for an attribute holding zero or more dates,
/// such as the `top3` dates of a task.
///
/// Lines are offered to three grammars in order:
/// 1. fixed phrases `has <field> date` and `no <field> date`;
/// 2. `<field> count <op> <n>` with `op` one of `>`, `>=`, `<`, `<=`, `=`, `is`;
/// 3. `<field> [keyword] <date or range>` where keyword is `before`, `after`,
///    `on or before`, `in or before`, `on or after`, `in or after`, `on` or `in`.
///
/// Every date comparison uses the latest date of the task.
pub struct MultiDateField {
    name: String,
    display_name: String,
    dates: DatesAccessor,
    count: CountAccessor,
    instructions: FilterInstructions,
    count_regex: Regex,
    filter_regex: Regex,
    date_parser: DateParser,
}

impl MultiDateField {
    pub fn new(name: impl Into<String>, dates: DatesAccessor, count: CountAccessor) -> Self {
        let name = name.into();
        let escaped = regex::escape(&name);
        let count_regex = Regex::new(&format!(
            r"(?i)^{escaped} count\s*(>=|<=|>|<|=|is)\s*(\d+)$"
        ))
        .expect("escaped field name forms a valid pattern");
        let filter_regex = Regex::new(&format!(
            r"(?i)^{escaped} (((?:on|in) or before|before|(?:on|in) or after|after|on|in)? ?(.*))"
        ))
        .expect("escaped field name forms a valid pattern");

        let mut instructions = FilterInstructions::new();
        instructions.add(format!("has {name} date"), move |task: &Task| {
            !dates(task).is_empty()
        });
        instructions.add(format!("no {name} date"), move |task: &Task| {
            dates(task).is_empty()
        });

        Self {
            display_name: capitalize(&name),
            name,
            dates,
            count,
            instructions,
            count_regex,
            filter_regex,
            date_parser: DateParser::new(),
        }
    }

    /// The `top3` field of [`Task`].
    pub fn top3() -> Self {
        Self::new("top3", top3_dates, top3_count)
    }

    /// Resolves relative dates such as `today` against `date_parser`.
    pub fn with_date_parser(mut self, date_parser: DateParser) -> Self {
        self.date_parser = date_parser;
        self
    }

    fn unrecognized(&self, line: &str) -> CompileError {
        CompileError::new(
            line,
            format!("do not understand query filter ({} date)", self.name),
        )
    }

    fn instruction_grammar(&self, line: &str) -> GrammarOutcome {
        self.instructions.compile(line).map(Ok)
    }

    fn count_grammar(&self, line: &str) -> GrammarOutcome {
        let caps = self.count_regex.captures(line)?;
        Some(self.create_count_filter(line, &caps[1], &caps[2]))
    }

    fn create_count_filter(
        &self,
        line: &str,
        operator: &str,
        value: &str,
    ) -> Result<Filter, CompileError> {
        let Some(op) = CountOp::parse(operator) else {
            return Err(CompileError::new(line, format!("Unknown operator: {operator}")));
        };
        let Ok(value) = value.parse::<usize>() else {
            return Err(CompileError::new(
                line,
                format!("do not understand {} count", self.name),
            ));
        };
        let count = self.count;
        let explanation = Explanation::leaf(format!(
            "{} count is {} {value}",
            self.name,
            op.phrase()
        ));
        Ok(Filter::new(
            line,
            move |task: &Task| op.holds(count(task), value),
            explanation,
        ))
    }

    fn date_grammar(&self, line: &str) -> GrammarOutcome {
        let caps = self.filter_regex.captures(line)?;
        Some(self.create_date_filter(line, &caps))
    }

    fn create_date_filter(&self, line: &str, caps: &Captures<'_>) -> Result<Filter, CompileError> {
        let keyword_and_date = caps.get(1).map_or("", |m| m.as_str());
        let keyword = caps.get(2);
        let relation = keyword.map_or(Relation::On, |m| Relation::from_keyword(m.as_str()));
        let date_text = caps.get(3).map_or("", |m| m.as_str());

        // only the captured keyword may be skipped before the date text
        let range = self
            .date_parser
            .parse_date_range(keyword_and_date)
            .or_else(|| keyword.and_then(|_| self.date_parser.parse_date_range(date_text)))
            .or_else(|| {
                self.date_parser
                    .parse_date(date_text)
                    .map(DateRange::single_day)
            })
            .ok_or_else(|| {
                CompileError::new(line, format!("do not understand {} date", self.name))
            })?;

        let dates = self.dates;
        let explanation = self.explain(relation, range);
        Ok(Filter::new(
            line,
            move |task: &Task| {
                latest_date(dates(task)).is_some_and(|latest| relation.holds(latest, range))
            },
            explanation,
        ))
    }

    fn explain(&self, relation: Relation, range: DateRange) -> Explanation {
        let (wording, date) = match relation {
            Relation::Before => ("before", range.start()),
            Relation::OnOrAfter => ("on or after", range.start()),
            Relation::After => ("after", range.end()),
            Relation::OnOrBefore => ("on or before", range.end()),
            Relation::On if !range.is_single_day() => {
                return Explanation::node(
                    format!("{} date is between:", self.name),
                    vec![
                        Explanation::leaf(format!("{} and", format_date(range.start()))),
                        Explanation::leaf(format!("{} inclusive", format_date(range.end()))),
                    ],
                );
            }
            Relation::On => ("on", range.start()),
        };
        Explanation::leaf(format!(
            "{} date is {wording} {}",
            self.name,
            format_date(date)
        ))
    }
}

impl Field for MultiDateField {
    fn field_name(&self) -> &str {
        &self.name
    }

    fn recognizes(&self, line: &str) -> bool {
        self.instructions.recognizes(line)
            || self.count_regex.is_match(line)
            || self.filter_regex.is_match(line)
    }

    fn compile(&self, line: &str) -> Result<Filter, CompileError> {
        const GRAMMARS: [(&str, Grammar); 3] = [
            ("instruction", MultiDateField::instruction_grammar),
            ("count", MultiDateField::count_grammar),
            ("date", MultiDateField::date_grammar),
        ];
        for (kind, grammar) in GRAMMARS {
            if let Some(outcome) = grammar(self, line) {
                debug!("{} {kind} grammar claimed {line:?}", self.name);
                return outcome;
            }
        }
        debug!("{} field does not own {line:?}", self.name);
        Err(self.unrecognized(line))
    }

    /// Sorts by latest date, oldest first; tasks without dates come last.
    fn comparator(&self) -> Option<Comparator> {
        let dates = self.dates;
        Some(Arc::new(move |a: &Task, b: &Task| {
            compare_by_date(latest_date(dates(a)), latest_date(dates(b)))
        }))
    }

    /// Groups by how many dates the task has.
    fn grouper(&self) -> Option<GrouperFunction> {
        let dates = self.dates;
        let name = self.name.clone();
        let display_name = self.display_name.clone();
        Some(Arc::new(move |task: &Task| {
            let count = dates(task).len();
            let heading = match count {
                0 => format!("No {name} dates"),
                1 => format!("{display_name}: 1 time"),
                n => format!("{display_name}: {n} times"),
            };
            vec![heading]
        }))
    }
}

fn top3_dates(task: &Task) -> &[Date] {
    &task.top3_dates
}

fn top3_count(task: &Task) -> usize {
    task.top3_count
}

/// Most recent date; among equal maxima the first one seen wins.
pub fn latest_date(dates: &[Date]) -> Option<Date> {
    dates
        .iter()
        .copied()
        .reduce(|latest, current| if current > latest { current } else { latest })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountOp {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
}

impl CountOp {
    fn parse(operator: &str) -> Option<Self> {
        match operator.to_ascii_lowercase().as_str() {
            ">" => Some(CountOp::Gt),
            ">=" => Some(CountOp::Gte),
            "<" => Some(CountOp::Lt),
            "<=" => Some(CountOp::Lte),
            "=" | "is" => Some(CountOp::Eq),
            _ => None,
        }
    }

    fn holds(self, count: usize, value: usize) -> bool {
        match self {
            CountOp::Gt => count > value,
            CountOp::Gte => count >= value,
            CountOp::Lt => count < value,
            CountOp::Lte => count <= value,
            CountOp::Eq => count == value,
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            CountOp::Gt => "greater than",
            CountOp::Gte => "at least",
            CountOp::Lt => "less than",
            CountOp::Lte => "at most",
            CountOp::Eq => "exactly",
        }
    }
}

/// `in or before` and `in or after` collapse onto their `on` spellings; the
/// bare form, `on` and `in` all mean "within the range".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Before,
    After,
    OnOrBefore,
    OnOrAfter,
    On,
}

impl Relation {
    fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_lowercase().as_str() {
            "before" => Relation::Before,
            "after" => Relation::After,
            "on or before" | "in or before" => Relation::OnOrBefore,
            "on or after" | "in or after" => Relation::OnOrAfter,
            _ => Relation::On,
        }
    }

    fn holds(self, latest: Date, range: DateRange) -> bool {
        match self {
            Relation::Before => latest < range.start(),
            Relation::After => latest > range.end(),
            Relation::OnOrBefore => latest <= range.end(),
            Relation::OnOrAfter => latest >= range.start(),
            Relation::On => range.contains(latest),
        }
    }
}

/// `2024-01-15 (Monday 15th January 2024)`
fn format_date(date: Date) -> String {
    format!(
        "{date} ({} {}{} {} {})",
        date.strftime("%A"),
        date.day(),
        ordinal_suffix(date.day()),
        date.strftime("%B"),
        date.year()
    )
}

fn ordinal_suffix(day: i8) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
