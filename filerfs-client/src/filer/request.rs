// Copyright 2025 OPPO.
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

use filerfs_common::fs::Path;
use filerfs_common::state::Entry;
use filerfs_common::FsResult;

// Creates `entry` under `directory`. Fails if the name is taken.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateEntryRequest {
    pub directory: Path,
    pub entry: Entry,
    pub signatures: Vec<i32>,
}

impl CreateEntryRequest {
    pub fn new(directory: Path, entry: Entry, signature: i32) -> Self {
        Self {
            directory,
            entry,
            signatures: vec![signature],
        }
    }

    pub fn full_path(&self) -> FsResult<Path> {
        self.directory.join(&self.entry.name)
    }
}

// Replaces the stored entry at `directory/entry.name` wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEntryRequest {
    pub directory: Path,
    pub entry: Entry,
    pub signatures: Vec<i32>,
}

impl UpdateEntryRequest {
    pub fn new(directory: Path, entry: Entry, signature: i32) -> Self {
        Self {
            directory,
            entry,
            signatures: vec![signature],
        }
    }

    pub fn full_path(&self) -> FsResult<Path> {
        self.directory.join(&self.entry.name)
    }
}

/// Requests that carry an entry across the filer boundary.
/// Used to translate owner and group ids around each remote call.
pub trait EntryRequest {
    fn entry_mut(&mut self) -> &mut Entry;
}

impl EntryRequest for CreateEntryRequest {
    fn entry_mut(&mut self) -> &mut Entry {
        &mut self.entry
    }
}

impl EntryRequest for UpdateEntryRequest {
    fn entry_mut(&mut self) -> &mut Entry {
        &mut self.entry
    }
}
