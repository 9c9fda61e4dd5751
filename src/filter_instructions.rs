use crate::{Explanation, Filter, FilterFunction, Task};
use std::sync::Arc;

struct FilterInstruction {
    phrase: String,
    function: FilterFunction,
}

/// Fixed phrases such as `has top3 date`, each bound to a predicate.
///
/// Matching is case-insensitive and whole-line: `has top3 dates` is not
/// `has top3 date`.
#[derive(Default)]
pub struct FilterInstructions {
    instructions: Vec<FilterInstruction>,
}

impl FilterInstructions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        phrase: impl Into<String>,
        function: impl Fn(&Task) -> bool + Send + Sync + 'static,
    ) {
        self.instructions.push(FilterInstruction {
            phrase: phrase.into().to_lowercase(),
            function: Arc::new(function),
        });
    }

    pub fn recognizes(&self, line: &str) -> bool {
        self.find(line).is_some()
    }

    /// `None` when no phrase matches, so the caller can try another grammar.
    pub fn compile(&self, line: &str) -> Option<Filter> {
        let instruction = self.find(line)?;
        let function = instruction.function.clone();
        Some(Filter::new(
            line,
            move |task: &Task| function(task),
            Explanation::leaf(instruction.phrase.clone()),
        ))
    }

    fn find(&self, line: &str) -> Option<&FilterInstruction> {
        let lowered = line.to_lowercase();
        self.instructions
            .iter()
            .find(|instruction| instruction.phrase == lowered)
    }
}
