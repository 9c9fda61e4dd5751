use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How the `top3` dates of a task are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Top3DisplayMode {
    /// Every date.
    #[default]
    All,
    /// Only the most recent date.
    Latest,
    /// The number of dates instead of the dates.
    Count,
}

impl FromStr for Top3DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Top3DisplayMode::All),
            "latest" => Ok(Top3DisplayMode::Latest),
            "count" => Ok(Top3DisplayMode::Count),
            other => Err(format!("unknown top3 display mode: {other:?}")),
        }
    }
}

impl fmt::Display for Top3DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Top3DisplayMode::All => "all",
            Top3DisplayMode::Latest => "latest",
            Top3DisplayMode::Count => "count",
        })
    }
}

/// Rendering switches a query can flip with `hide`/`show` lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryLayoutOptions {
    pub hide_toolbar: bool,
    pub hide_postpone_button: bool,
    pub hide_task_count: bool,
    pub hide_backlinks: bool,
    pub hide_edit_button: bool,
    pub hide_urgency: bool,
    pub hide_tree: bool,
    pub short_mode: bool,
    pub explain_query: bool,
    pub top3_display_mode: Top3DisplayMode,
}

impl Default for QueryLayoutOptions {
    fn default() -> Self {
        Self {
            hide_toolbar: true,
            hide_postpone_button: false,
            hide_task_count: false,
            hide_backlinks: false,
            hide_edit_button: false,
            hide_urgency: true,
            hide_tree: true,
            short_mode: false,
            explain_query: false,
            top3_display_mode: Top3DisplayMode::All,
        }
    }
}

/// Vocabulary accepted after `hide`/`show`, in the order it is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOption {
    Backlink,
    EditButton,
    PostponeButton,
    TaskCount,
    Toolbar,
    Tree,
    Urgency,
}

impl LayoutOption {
    const ALL: [LayoutOption; 7] = [
        LayoutOption::Backlink,
        LayoutOption::EditButton,
        LayoutOption::PostponeButton,
        LayoutOption::TaskCount,
        LayoutOption::Toolbar,
        LayoutOption::Tree,
        LayoutOption::Urgency,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            LayoutOption::Backlink => "backlink",
            LayoutOption::EditButton => "edit button",
            LayoutOption::PostponeButton => "postpone button",
            LayoutOption::TaskCount => "task count",
            LayoutOption::Toolbar => "toolbar",
            LayoutOption::Tree => "tree",
            LayoutOption::Urgency => "urgency",
        }
    }

    /// First option whose keyword `option` starts with, so `backlinks`
    /// selects [`LayoutOption::Backlink`].
    pub fn from_prefix(option: &str) -> Option<Self> {
        let lowered = option.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|candidate| lowered.starts_with(candidate.keyword()))
    }
}

impl QueryLayoutOptions {
    fn flag_mut(&mut self, option: LayoutOption) -> &mut bool {
        match option {
            LayoutOption::Backlink => &mut self.hide_backlinks,
            LayoutOption::EditButton => &mut self.hide_edit_button,
            LayoutOption::PostponeButton => &mut self.hide_postpone_button,
            LayoutOption::TaskCount => &mut self.hide_task_count,
            LayoutOption::Toolbar => &mut self.hide_toolbar,
            LayoutOption::Tree => &mut self.hide_tree,
            LayoutOption::Urgency => &mut self.hide_urgency,
        }
    }
}

/// Applies a `hide <option>` (`hide == true`) or `show <option>` line.
///
/// Returns whether `option` named a known layout option.
pub fn parse_query_show_hide_options(
    options: &mut QueryLayoutOptions,
    option: &str,
    hide: bool,
) -> bool {
    match LayoutOption::from_prefix(option) {
        Some(layout_option) => {
            *options.flag_mut(layout_option) = hide;
            true
        }
        None => false,
    }
}
