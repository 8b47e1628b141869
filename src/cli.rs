// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::cmd::decks::list_decks;
use crate::cmd::history::clear_history;
use crate::cmd::history::show_history;
use crate::cmd::import::import_notes;
use crate::cmd::models::list_models;
use crate::cmd::quiz::QuizArgs;
use crate::cmd::quiz::run_quiz;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Take a multiple-choice quiz.
    Quiz(QuizArgs),
    /// List the decks in the collection.
    Decks {
        /// Optional path to the collection directory.
        directory: Option<String>,
    },
    /// List the note types in a deck and their fields.
    Models {
        /// Optional path to the collection directory.
        directory: Option<String>,
        /// The deck to inspect. Defaults to the last quizzed deck.
        #[arg(long)]
        deck: Option<String>,
    },
    /// Import notes from a TOML file.
    Import {
        /// Path to the file to import.
        file: PathBuf,
        /// Optional path to the collection directory.
        directory: Option<String>,
    },
    /// Show or clear the record of quizzed notes.
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// Print the IDs of previously quizzed notes.
    Show {
        /// Optional path to the collection directory.
        directory: Option<String>,
    },
    /// Forget all previously quizzed notes.
    Clear {
        /// Optional path to the collection directory.
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    let mut out = std::io::stdout();
    match cli {
        Command::Quiz(args) => run_quiz(args),
        Command::Decks { directory } => list_decks(directory, &mut out),
        Command::Models { directory, deck } => list_models(directory, deck, &mut out),
        Command::Import { file, directory } => import_notes(directory, &file),
        Command::History { command } => match command {
            HistoryCommand::Show { directory } => show_history(directory, &mut out),
            HistoryCommand::Clear { directory } => clear_history(directory, &mut out),
        },
    }
}
