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

//! Markup stripping and answer normalization.

use std::sync::LazyLock;

use regex::Regex;

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[^>]+>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Convert field markup into plain text for display: line breaks become
/// newlines, every other tag is dropped.
pub fn strip_markup(text: &str) -> String {
    let text = LINE_BREAK.replace_all(text, "\n");
    let text = TAG.replace_all(&text, "");
    text.trim().to_string()
}

/// Compute the key used to decide whether two answers are the same.
///
/// Line breaks (both literal and `<br>` markup) are removed, the text is
/// trimmed and lower-cased, and runs of whitespace collapse to one space.
pub fn normalize(text: &str) -> String {
    let mut text = text.replace(['\r', '\n'], "");
    // Removing one tag can splice together another.
    while LINE_BREAK.is_match(&text) {
        text = LINE_BREAK.replace_all(&text, "").into_owned();
    }
    let text = text.trim().to_lowercase();
    WHITESPACE.replace_all(&text, " ").into_owned()
}

/// Whether two pieces of field text count as the same answer.
pub fn same_answer(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
