use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect to Telegram and serve the bot (default)
    Run,

    /// Translate a piece of text once and print the result
    Translate {
        /// Text to translate
        text: String,

        /// Target language (zh-CN or en); defaults to the opposite of the detected language
        #[arg(short, long)]
        to: Option<String>,

        /// Source language; detected when omitted
        #[arg(short, long)]
        from: Option<String>,
    },

    /// Show which language the bot would detect for a text
    Detect {
        /// Text to classify
        text: String,
    },
}
