use std::fmt;

/// Human readable account of what a compiled filter checks.
///
/// Only used for output; matching never consults it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    Leaf(String),
    Node {
        description: String,
        children: Vec<Explanation>,
    },
}

impl Explanation {
    pub fn leaf(description: impl Into<String>) -> Self {
        Explanation::Leaf(description.into())
    }

    pub fn node(description: impl Into<String>, children: Vec<Explanation>) -> Self {
        Explanation::Node {
            description: description.into(),
            children,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Explanation::Leaf(description) | Explanation::Node { description, .. } => description,
        }
    }

    pub fn children(&self) -> &[Explanation] {
        match self {
            Explanation::Leaf(_) => &[],
            Explanation::Node { children, .. } => children,
        }
    }

    /// Depth-first rendering, children indented two spaces below their parent.
    pub fn render(&self, indentation: &str) -> String {
        let mut out = String::new();
        self.render_into(indentation, &mut out);
        out
    }

    fn render_into(&self, indentation: &str, out: &mut String) {
        out.push_str(indentation);
        out.push_str(self.description());
        let nested = format!("{indentation}  ");
        for child in self.children() {
            out.push('\n');
            child.render_into(&nested, out);
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}
