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
use crate::fs::{File, FileAttr, FilerFs, Node};
use crate::{err_fuse, FuseResult, FUSE_MAX_NAME_LENGTH};
use filerfs_common::fs::Path;
use filerfs_common::state::Entry;
use log::debug;
use std::fmt;
use std::sync::Arc;

pub struct Dir {
    wfs: Arc<FilerFs>,
    path: Path,
    entry: ResidentEntry,
}

impl fmt::Debug for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dir").field("path", &self.path).finish()
    }
}

impl Dir {
    pub(crate) fn new(wfs: Arc<FilerFs>, path: Path) -> Self {
        Self {
            wfs,
            path,
            entry: ResidentEntry::default(),
        }
    }

    pub fn wfs(&self) -> &Arc<FilerFs> {
        &self.wfs
    }

    pub fn full_path(&self) -> &Path {
        &self.path
    }

    pub fn get_entry(&self) -> Option<Entry> {
        self.entry.get()
    }

    pub async fn maybe_load_entry(&self) -> FuseResult<Entry> {
        let entry = self.wfs.lookup_entry(&self.path).await?;
        self.entry.set(entry.clone());
        Ok(entry)
    }

    pub(crate) fn check_name(name: &str) -> FuseResult<()> {
        if name.len() > FUSE_MAX_NAME_LENGTH {
            return err_fuse!(libc::ENAMETOOLONG, "name too long: {}", name.len());
        }
        Path::check_name(name)?;
        Ok(())
    }

    // A file node for `name` in this directory, optionally with its entry already known.
    pub fn new_file(&self, name: &str, entry: Option<Entry>) -> FuseResult<Arc<File>> {
        let file = File::new(self.wfs.clone(), self.path.clone(), name, entry)?;
        Ok(Arc::new(file))
    }

    pub async fn lookup(&self, name: &str) -> FuseResult<Node> {
        Self::check_name(name)?;
        let path = self.path.join(name)?;
        let entry = self.wfs.lookup_entry(&path).await?;
        debug!("lookup {} is_directory {}", path, entry.is_directory);

        let node = if entry.is_directory {
            let dir = Dir::new(self.wfs.clone(), path);
            dir.entry.set(entry);
            Node::Dir(Arc::new(dir))
        } else {
            Node::File(self.new_file(name, Some(entry))?)
        };
        Ok(node)
    }

    pub async fn attr(&self) -> FuseResult<FileAttr> {
        let entry = self.maybe_load_entry().await?;
        Ok(FileAttr::from_entry(self.wfs.conf(), &self.path, &entry))
    }
}
