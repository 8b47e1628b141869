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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// A card-state flag used to filter notes.
///
/// `Due` is a derived condition rather than a stored state: a learning or
/// review card whose due date has arrived.
#[derive(ValueEnum, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardState {
    /// Cards that have never been studied.
    New,
    /// Cards in the learning steps.
    Learn,
    /// Learning or review cards due today or earlier.
    Due,
    /// Cards that graduated to review.
    Review,
}

impl CardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardState::New => "new",
            CardState::Learn => "learn",
            CardState::Due => "due",
            CardState::Review => "review",
        }
    }
}

impl Display for CardState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for CardState {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "new" => Ok(CardState::New),
            "learn" => Ok(CardState::Learn),
            "due" => Ok(CardState::Due),
            "review" => Ok(CardState::Review),
            _ => fail(format!("Invalid card state: {}", value)),
        }
    }
}

/// The scheduling state stored on a card.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredState {
    #[default]
    New,
    Learn,
    Review,
}

impl StoredState {
    fn as_str(&self) -> &'static str {
        match self {
            StoredState::New => "new",
            StoredState::Learn => "learn",
            StoredState::Review => "review",
        }
    }
}

impl TryFrom<String> for StoredState {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "new" => Ok(StoredState::New),
            "learn" => Ok(StoredState::Learn),
            "review" => Ok(StoredState::Review),
            _ => fail(format!("Invalid stored card state: {}", value)),
        }
    }
}

impl ToSql for StoredState {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for StoredState {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        StoredState::try_from(string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
