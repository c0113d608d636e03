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

use crate::fs::{Dir, File, FileAttr};
use crate::FuseResult;
use filerfs_common::fs::Path;
use filerfs_common::state::Entry;
use std::sync::{Arc, Mutex, PoisonError};

/// A node handed out to the kernel side: a directory or a file.
/// Symlinks are files whose entry mode carries the link type.
#[derive(Debug, Clone)]
pub enum Node {
    Dir(Arc<Dir>),
    File(Arc<File>),
}

impl Node {
    pub fn as_directory(&self) -> Option<&Arc<Dir>> {
        match self {
            Node::Dir(v) => Some(v),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&Arc<File>> {
        match self {
            Node::Dir(_) => None,
            Node::File(v) => Some(v),
        }
    }

    // Decided on the resident entry, a node that was never loaded is not a symlink.
    pub fn as_symlink(&self) -> Option<&Arc<File>> {
        self.as_file()
            .filter(|f| f.get_entry().is_some_and(|e| e.is_symlink()))
    }

    pub fn full_path(&self) -> &Path {
        match self {
            Node::Dir(v) => v.full_path(),
            Node::File(v) => v.full_path(),
        }
    }

    pub async fn attr(&self) -> FuseResult<FileAttr> {
        match self {
            Node::Dir(v) => v.attr().await,
            Node::File(v) => v.attr().await,
        }
    }
}

// The entry a node last saw. Replaced wholesale, never mutated in place, so a
// request works on its own copy and no lock is held across a filer call.
#[derive(Default)]
pub(crate) struct ResidentEntry {
    entry: Mutex<Option<Entry>>,
}

impl ResidentEntry {
    pub(crate) fn new(entry: Option<Entry>) -> Self {
        Self {
            entry: Mutex::new(entry),
        }
    }

    pub(crate) fn get(&self) -> Option<Entry> {
        self.entry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set(&self, entry: Entry) {
        let mut lock = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        *lock = Some(entry);
    }
}
