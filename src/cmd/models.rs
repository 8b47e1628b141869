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

use std::io::Write;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::extract::models_and_fields;
use crate::filter::NoteQuery;
use crate::filter::find_notes;

/// Print the note types used in a deck, with their fields.
pub fn list_models(
    directory: Option<String>,
    deck: Option<String>,
    out: &mut impl Write,
) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let deck = match deck {
        Some(deck) => deck,
        None => coll.load_config().default_deck,
    };
    if deck.is_empty() {
        return fail("no deck given.");
    }
    let ids = find_notes(&coll.db, &NoteQuery::new(&deck))?;
    let models = models_and_fields(&coll.db, &ids)?;
    if models.is_empty() {
        writeln!(out, "No notes in deck '{deck}'.")?;
    }
    for (name, fields) in models {
        writeln!(out, "{name}: {}", fields.join(", "))?;
    }
    Ok(())
}
