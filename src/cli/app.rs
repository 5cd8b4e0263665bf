use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "savi")]
#[command(about = "Game save-file inspection toolkit")]
#[command(version)]
pub struct Cli {
    /// Control colored output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse save file(s) and display the schema report
    Parse {
        /// Path(s) to save files (e.g. playerInfo.dat)
        #[arg(required = true)]
        files: Vec<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Record budget for the binary decoder
        #[arg(long = "max-records")]
        max_records: Option<usize>,
    },

    /// Trace the binary record stream record-by-record
    Records {
        /// Path to a save file
        file: String,

        /// Stop after this many records of output
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Record budget for the binary decoder
        #[arg(long = "max-records")]
        max_records: Option<usize>,
    },

    /// Write the canonical and raw JSON documents to a directory
    Export {
        /// Path to a save file
        file: String,

        /// Output directory (created if missing)
        #[arg(long, default_value = "out")]
        out: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}
