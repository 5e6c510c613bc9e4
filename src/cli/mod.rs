use std::path::PathBuf;

use clap::Subcommand;

use crate::domain::ModelIdentifier;

pub mod repl;

#[derive(Subcommand)]
pub enum Commands {
    /// List allowed models installed on the server, and the ones that can be downloaded
    Models,

    /// Download a model onto the server
    Pull {
        model: ModelIdentifier,
    },

    /// Ask a single question about a file
    Ask {
        /// CSV, TXT, DOCX, PNG or JPEG file
        file: PathBuf,

        question: String,

        #[arg(short, long)]
        model: Option<ModelIdentifier>,
    },

    /// Chat interactively about a file
    Chat {
        /// CSV, TXT, DOCX, PNG or JPEG file
        file: PathBuf,

        #[arg(short, long)]
        model: Option<ModelIdentifier>,
    },
}
