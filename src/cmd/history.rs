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

pub fn show_history(directory: Option<String>, out: &mut impl Write) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let count = coll.history.load().len();
    writeln!(out, "{count} notes have appeared in past quizzes.")?;
    Ok(())
}

pub fn clear_history(directory: Option<String>, out: &mut impl Write) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    coll.history.clear()?;
    writeln!(out, "Quiz history cleared.")?;
    Ok(())
}
