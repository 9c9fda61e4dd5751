//! # Per-field filter compiler for task queries
//!
//! Each line of a query document is compiled on its own by the first
//! [`Field`] that recognizes it, producing a [`Filter`] (predicate plus
//! [`Explanation`]) or a [`CompileError`]. Fields may also offer a sort
//! [`Comparator`] and a [`GrouperFunction`].
//!
//! ```
//! use task_query::{Field, MultiDateField, Task};
//! use jiff::civil::date;
//!
//! let field = MultiDateField::top3();
//! let filter = field.compile("top3 2024-01-01 to 2024-01-31").unwrap();
//! assert!(filter.matches(&Task::new("review", vec![date(2024, 1, 15)])));
//! assert!(!filter.matches(&Task::new("plan", vec![date(2024, 2, 1)])));
//!
//! let error = field.compile("top3 not-a-date").unwrap_err();
//! assert_eq!(error.message, "do not understand top3 date");
//! ```
mod explanation;
mod field;
mod filter;
mod filter_instructions;
mod layout;
mod multi_date_field;
mod query;
mod task;

pub use date_parser::{DateParser, DateRange};
pub use explanation::*;
pub use field::*;
pub use filter::*;
pub use filter_instructions::*;
pub use layout::*;
pub use multi_date_field::*;
pub use query::*;
pub use task::*;
