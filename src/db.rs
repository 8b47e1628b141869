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

use chrono::Local;
use chrono::NaiveDate;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::error::Fallible;
use crate::error::fail;
use crate::filter::NoteQuery;
use crate::source::NoteSource;
use crate::types::card_state::CardState;
use crate::types::card_state::StoredState;
use crate::types::note::Note;
use crate::types::note::NoteType;
use crate::types::note_id::DeckId;
use crate::types::note_id::NoteId;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The collection store: decks, note types, notes, and their cards.
pub struct Database {
    conn: Connection,
    /// The date `is:due` is evaluated against.
    today: NaiveDate,
}

/// A note to be added, with the single card generated from it.
pub struct NewNote {
    /// Field values, in the note type's field order.
    pub values: Vec<String>,
    pub tags: Vec<String>,
    pub state: StoredState,
    pub due_date: Option<NaiveDate>,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let today = Local::now().date_naive();
        Ok(Self { conn, today })
    }

    #[cfg(test)]
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    /// Add notes of one type to a deck, creating the deck (and its parents)
    /// and the note type as needed. Everything is written in a single
    /// transaction.
    pub fn import(
        &mut self,
        deck_name: &str,
        note_type: &NoteType,
        notes: &[NewNote],
    ) -> Fallible<Vec<NoteId>> {
        let tx = self.conn.transaction()?;
        let deck_id = ensure_deck(&tx, deck_name)?;
        let note_type_id = ensure_note_type(&tx, note_type)?;
        let mut ids = Vec::with_capacity(notes.len());
        for note in notes {
            if note.values.len() != note_type.fields.len() {
                return fail(format!(
                    "note type '{}' has {} fields, but a note has {} values.",
                    note_type.name,
                    note_type.fields.len(),
                    note.values.len()
                ));
            }
            let note_id = insert_note(&tx, note_type_id, &note_type.fields, note)?;
            insert_card(&tx, note_id, deck_id, note)?;
            ids.push(note_id);
        }
        tx.commit()?;
        log::debug!("Imported {} notes into '{deck_name}'.", ids.len());
        Ok(ids)
    }

    fn field_names(&self, note_type_id: i64) -> Fallible<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("select name from note_type_fields where note_type_id = ? order by ord;")?;
        let mut rows = stmt.query([note_type_id])?;
        let mut fields = Vec::new();
        while let Some(row) = rows.next()? {
            fields.push(row.get(0)?);
        }
        Ok(fields)
    }
}

impl NoteSource for Database {
    fn find_note_ids(&self, query: &NoteQuery) -> Fallible<Vec<NoteId>> {
        let mut sql = String::from(
            "select distinct n.note_id from notes n \
             join cards c on c.note_id = n.note_id \
             join decks d on d.deck_id = c.deck_id \
             where (d.name = ? collate nocase or d.name like ? escape '\\')",
        );
        let mut params: Vec<Value> = vec![
            Value::Text(query.deck().to_string()),
            Value::Text(format!("{}::%", escape_like(query.deck()))),
        ];
        for tag in query.excluded_tags() {
            sql.push_str(
                " and not exists (select 1 from note_tags t where t.note_id = n.note_id and t.tag = ? collate nocase)",
            );
            params.push(Value::Text(tag.clone()));
        }
        if !query.states().is_empty() {
            let mut clauses = Vec::new();
            for state in query.states() {
                let clause = match state {
                    CardState::New => "c.state = 'new'",
                    CardState::Learn => "c.state = 'learn'",
                    CardState::Review => "c.state = 'review'",
                    CardState::Due => {
                        params.push(Value::Text(self.today.format(DATE_FORMAT).to_string()));
                        "(c.state in ('learn', 'review') and c.due_date is not null and c.due_date <= ?)"
                    }
                };
                clauses.push(clause);
            }
            sql.push_str(&format!(" and ({})", clauses.join(" or ")));
        }
        sql.push_str(" order by n.note_id;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(params))?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }
        Ok(ids)
    }

    fn get_note(&self, id: NoteId) -> Fallible<Option<Note>> {
        let sql = "select t.name from notes n join note_types t on t.note_type_id = n.note_type_id where n.note_id = ?;";
        let note_type: Option<String> = self
            .conn
            .query_row(sql, [id], |row| row.get(0))
            .optional()?;
        let Some(note_type) = note_type else {
            return Ok(None);
        };

        let sql = "select f.name, coalesce(v.value, '') from notes n \
                   join note_type_fields f on f.note_type_id = n.note_type_id \
                   left join note_field_values v on v.note_id = n.note_id and v.name = f.name \
                   where n.note_id = ? order by f.ord;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([id])?;
        let mut fields = Vec::new();
        while let Some(row) = rows.next()? {
            fields.push((row.get(0)?, row.get(1)?));
        }

        Ok(Some(Note::new(id, note_type, fields)))
    }

    fn get_note_type(&self, name: &str) -> Fallible<Option<NoteType>> {
        let sql = "select note_type_id from note_types where name = ?;";
        let note_type_id: Option<i64> = self
            .conn
            .query_row(sql, [name], |row| row.get(0))
            .optional()?;
        match note_type_id {
            Some(note_type_id) => Ok(Some(NoteType {
                name: name.to_string(),
                fields: self.field_names(note_type_id)?,
            })),
            None => Ok(None),
        }
    }

    fn all_deck_names(&self) -> Fallible<Vec<(DeckId, String)>> {
        let mut stmt = self
            .conn
            .prepare("select deck_id, name from decks order by name;")?;
        let mut rows = stmt.query([])?;
        let mut decks = Vec::new();
        while let Some(row) = rows.next()? {
            decks.push((row.get(0)?, row.get(1)?));
        }
        Ok(decks)
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Find or create a deck. Parent decks (`A` for `A::B`) are created too.
fn ensure_deck(tx: &Transaction, name: &str) -> Fallible<DeckId> {
    let name = name.trim();
    if name.is_empty() || name.split("::").any(|part| part.trim().is_empty()) {
        return fail(format!("invalid deck name: '{name}'."));
    }
    let parts: Vec<&str> = name.split("::").collect();
    for end in 1..=parts.len() {
        let prefix = parts[..end].join("::");
        tx.execute(
            "insert or ignore into decks (name) values (?);",
            [&prefix],
        )?;
    }
    let deck_id: DeckId = tx.query_row(
        "select deck_id from decks where name = ?;",
        [name],
        |row| row.get(0),
    )?;
    Ok(deck_id)
}

/// Find or create a note type. An existing type must have the same fields.
fn ensure_note_type(tx: &Transaction, note_type: &NoteType) -> Fallible<i64> {
    if note_type.fields.is_empty() {
        return fail(format!("note type '{}' has no fields.", note_type.name));
    }
    let existing: Option<i64> = tx
        .query_row(
            "select note_type_id from note_types where name = ?;",
            [&note_type.name],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(note_type_id) = existing {
        let mut stmt =
            tx.prepare("select name from note_type_fields where note_type_id = ? order by ord;")?;
        let mut rows = stmt.query([note_type_id])?;
        let mut fields: Vec<String> = Vec::new();
        while let Some(row) = rows.next()? {
            fields.push(row.get(0)?);
        }
        if fields != note_type.fields {
            return fail(format!(
                "note type '{}' already exists with fields {:?}.",
                note_type.name, fields
            ));
        }
        return Ok(note_type_id);
    }
    let note_type_id: i64 = tx.query_row(
        "insert into note_types (name) values (?) returning note_type_id;",
        [&note_type.name],
        |row| row.get(0),
    )?;
    for (ord, field) in note_type.fields.iter().enumerate() {
        tx.execute(
            "insert into note_type_fields (note_type_id, ord, name) values (?, ?, ?);",
            (note_type_id, ord as i64, field),
        )?;
    }
    Ok(note_type_id)
}

fn insert_note(
    tx: &Transaction,
    note_type_id: i64,
    fields: &[String],
    note: &NewNote,
) -> Fallible<NoteId> {
    let note_id: NoteId = tx.query_row(
        "insert into notes (note_type_id) values (?) returning note_id;",
        [note_type_id],
        |row| row.get(0),
    )?;
    for (name, value) in fields.iter().zip(&note.values) {
        tx.execute(
            "insert into note_field_values (note_id, name, value) values (?, ?, ?);",
            (note_id, name, value),
        )?;
    }
    for tag in &note.tags {
        let tag = tag.trim();
        if !tag.is_empty() {
            tx.execute(
                "insert or ignore into note_tags (note_id, tag) values (?, ?);",
                (note_id, tag),
            )?;
        }
    }
    Ok(note_id)
}

fn insert_card(tx: &Transaction, note_id: NoteId, deck_id: DeckId, note: &NewNote) -> Fallible<()> {
    let due_date: Option<String> = note
        .due_date
        .map(|date| date.format(DATE_FORMAT).to_string());
    tx.execute(
        "insert into cards (note_id, deck_id, state, due_date) values (?, ?, ?, ?);",
        (note_id, deck_id, note.state, due_date),
    )?;
    Ok(())
}
