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

use crate::fs::node::ResidentEntry;
use crate::fs::{FileAttr, FilerFs};
use crate::FuseResult;
use filerfs_common::fs::Path;
use filerfs_common::state::Entry;
use std::fmt;
use std::sync::Arc;

pub struct File {
    wfs: Arc<FilerFs>,
    dir: Path,
    path: Path,
    entry: ResidentEntry,
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File").field("path", &self.path).finish()
    }
}

impl File {
    pub(crate) fn new(
        wfs: Arc<FilerFs>,
        dir: Path,
        name: &str,
        entry: Option<Entry>,
    ) -> FuseResult<Self> {
        let path = dir.join(name)?;
        Ok(Self {
            wfs,
            dir,
            path,
            entry: ResidentEntry::new(entry),
        })
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn dir_path(&self) -> &Path {
        &self.dir
    }

    pub fn full_path(&self) -> &Path {
        &self.path
    }

    pub fn get_entry(&self) -> Option<Entry> {
        self.entry.get()
    }

    pub(crate) fn set_entry(&self, entry: Entry) {
        self.entry.set(entry)
    }

    /// Latest known entry of this file, owned by the caller for the rest of the request.
    /// Read from the metadata cache, or from the filer when the cache misses.
    pub async fn maybe_load_entry(&self) -> FuseResult<Entry> {
        let entry = self.wfs.lookup_entry(&self.path).await?;
        self.entry.set(entry.clone());
        Ok(entry)
    }

    pub async fn attr(&self) -> FuseResult<FileAttr> {
        let entry = self.maybe_load_entry().await?;
        Ok(FileAttr::from_entry(self.wfs.conf(), &self.path, &entry))
    }
}
