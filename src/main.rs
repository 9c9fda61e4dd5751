mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use itertools::Itertools;
use std::fs;
use task_query::{Query, Task, Top3DisplayMode, default_fields, latest_date, load_tasks};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.query)
        .with_context(|| format!("failed to read query file {}", cli.query.display()))?;
    let query = Query::parse(&source, &default_fields()).context("invalid query")?;
    let tasks = load_tasks(&cli.tasks)?;
    info!("Loaded {} tasks from {}", tasks.len(), cli.tasks.display());

    let options = query.layout_options();
    if cli.explain || options.explain_query {
        println!("Explanation of this query:\n\n{}\n", query.explain());
    }

    let mut shown = 0;
    for group in query.apply(&tasks) {
        if !group.headings.is_empty() {
            println!("## {}", group.headings.join(" > "));
        }
        for task in group.tasks {
            println!("- {}", describe(task, options.top3_display_mode, options.short_mode));
            shown += 1;
        }
    }
    if !options.hide_task_count {
        println!("\n{shown} task{}", if shown == 1 { "" } else { "s" });
    }
    Ok(())
}

fn describe(task: &Task, mode: Top3DisplayMode, short_mode: bool) -> String {
    if short_mode || task.top3_dates.is_empty() {
        return task.description.clone();
    }
    let dates = match mode {
        Top3DisplayMode::All => task.top3_dates.iter().join(", "),
        Top3DisplayMode::Latest => latest_date(&task.top3_dates)
            .map(|date| date.to_string())
            .unwrap_or_default(),
        Top3DisplayMode::Count => format!("{}x", task.top3_count),
    };
    format!("{} [top3: {dates}]", task.description)
}
