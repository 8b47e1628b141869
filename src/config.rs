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
use std::fs::read_to_string;
use std::fs::write;
use std::io::ErrorKind;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::types::card_state::CardState;

pub const QUESTIONS: RangeInclusive<usize> = 1..=1000;
pub const CHOICES: RangeInclusive<usize> = 2..=10;
pub const PER_PAGE: RangeInclusive<usize> = 1..=20;
pub const FONT_SIZE: RangeInclusive<u32> = 6..=40;

/// Persisted user preferences. Missing keys take their defaults.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_deck: String,
    pub num_choices: usize,
    pub num_questions: usize,
    pub exclude_tags: Vec<String>,
    pub allow_answer_reuse: bool,
    pub last_model_name: String,
    pub last_prompt_field: String,
    pub last_answer_field: String,
    pub num_per_page: usize,
    pub card_states: Vec<CardState>,
    pub font_size_q: u32,
    pub font_size_a: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_deck: String::new(),
            num_choices: 4,
            num_questions: 25,
            exclude_tags: Vec::new(),
            allow_answer_reuse: true,
            last_model_name: String::new(),
            last_prompt_field: String::new(),
            last_answer_field: String::new(),
            num_per_page: 5,
            card_states: vec![CardState::Learn, CardState::Due],
            font_size_q: 22,
            font_size_a: 14,
        }
    }
}

impl Config {
    /// Read the configuration. A missing or unreadable file yields the
    /// defaults.
    pub fn load(path: &Path) -> Self {
        let content = match read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Failed to read config: {e}");
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(config) => config.clamped(),
            Err(e) => {
                log::warn!("Ignoring invalid config: {e}");
                Self::default()
            }
        }
    }

    /// Bring every numeric setting into its allowed range.
    fn clamped(self) -> Self {
        Self {
            num_questions: clamp("num_questions", self.num_questions, &QUESTIONS),
            num_choices: clamp("num_choices", self.num_choices, &CHOICES),
            num_per_page: clamp("num_per_page", self.num_per_page, &PER_PAGE),
            font_size_q: clamp("font_size_q", self.font_size_q, &FONT_SIZE),
            font_size_a: clamp("font_size_a", self.font_size_a, &FONT_SIZE),
            ..self
        }
    }

    pub fn save(&self, path: &Path) -> Fallible<()> {
        let json = serde_json::to_string_pretty(self)?;
        write(path, json)?;
        Ok(())
    }

    /// Save, logging instead of failing. Used where persisting preferences
    /// must not block the quiz.
    pub fn save_or_warn(&self, path: &Path) {
        if let Err(e) = self.save(path) {
            log::warn!("Failed to write config: {e}");
        }
    }
}

fn clamp<T: Ord + Copy + Display>(name: &str, value: T, range: &RangeInclusive<T>) -> T {
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        log::warn!("Config value {name} = {value} is out of range, using {clamped}.");
    }
    clamped
}
