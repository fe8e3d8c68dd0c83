use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shorecli",
    about = "Shoreline scene demo runner",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the built-in demo scenes
    List,
    /// Parse and validate a scene document
    Validate {
        /// Path to the .toml scene file (or a built-in demo name)
        file: String,
    },
    /// Run a scene headlessly with a simulated asset loader
    Run {
        /// Built-in demo name or path to a .toml scene file
        scene: String,
        /// Simulate a load failure for these entity ids (repeatable)
        #[arg(long)]
        fail: Vec<String>,
        /// Multiply every delay by this factor (e.g. 0.01 for quick runs)
        #[arg(long, default_value_t = 1.0)]
        time_scale: f64,
        /// Keyboard shortcuts to apply once loading settles, e.g. "rlg"
        #[arg(long, default_value = "")]
        keys: String,
    },
}
