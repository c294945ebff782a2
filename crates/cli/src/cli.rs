use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
#[command(version, about, long_about = None)]
pub enum Commands {
    /// Evaluate a binding expression to its view value
    Eval {
        /// Binding expression, e.g. 'user.name | upper'
        expression: String,
        /// JSON context file loaded into the scope
        #[clap(short, long)]
        context: Option<PathBuf>,
        /// Exchange rate as code=value (repeatable)
        #[clap(long = "rate")]
        rates: Vec<String>,
    },

    /// Run a view value backwards through a binding expression
    Invert {
        /// Binding expression, e.g. 'price | round:2 | prefix:"$"'
        expression: String,
        /// View-side value (JSON, or a bare string)
        #[clap(short, long)]
        value: String,
        /// JSON context file loaded into the scope
        #[clap(short, long)]
        context: Option<PathBuf>,
        /// Exchange rate as code=value (repeatable)
        #[clap(long = "rate")]
        rates: Vec<String>,
    },

    /// List registered converters
    List,
}

/// convey command
#[derive(Parser)]
#[command(about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}
