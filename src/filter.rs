use crate::{Explanation, Task};
use std::{fmt, sync::Arc};

/// Predicate produced by compiling one filter line.
pub type FilterFunction = Arc<dyn Fn(&Task) -> bool + Send + Sync>;

/// A successfully compiled filter line. Immutable once built.
#[derive(Clone)]
pub struct Filter {
    line: String,
    function: FilterFunction,
    explanation: Explanation,
}

impl Filter {
    pub fn new(
        line: impl Into<String>,
        function: impl Fn(&Task) -> bool + Send + Sync + 'static,
        explanation: Explanation,
    ) -> Self {
        Self {
            line: line.into(),
            function: Arc::new(function),
            explanation,
        }
    }

    /// The source line this filter was compiled from.
    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn explanation(&self) -> &Explanation {
        &self.explanation
    }

    pub fn function(&self) -> &FilterFunction {
        &self.function
    }

    pub fn matches(&self, task: &Task) -> bool {
        (self.function)(task)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("line", &self.line)
            .field("explanation", &self.explanation)
            .finish_non_exhaustive()
    }
}

/// Why a line could not be compiled. Never replaced by a default predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub line: String,
    pub message: String,
}

impl CompileError {
    pub fn new(line: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (problem line: {:?})", self.message, self.line)
    }
}

impl std::error::Error for CompileError {}
