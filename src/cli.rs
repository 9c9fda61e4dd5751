use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
pub struct Cli {
    /// Query document, one instruction per line.
    #[clap(long)]
    pub query: PathBuf,
    /// JSON array of tasks to run the query against.
    #[clap(long)]
    pub tasks: PathBuf,
    /// Print the explanation even when the query does not ask for it.
    #[clap(long, default_value = "false")]
    pub explain: bool,
}
