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

use crate::common::LocalTime;
use crate::fs::Path;
use crate::state::{FileMode, FileType, DEFAULT_DIR_PERM, DEFAULT_FILE_PERM, S_IFDIR, S_IFREG};
use std::collections::HashMap;
use std::hash::Hasher;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuseAttributes {
    pub file_size: u64,
    // Seconds since the unix epoch.
    pub mtime: i64,
    pub crtime: i64,
    pub file_mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub mime: String,
    pub ttl_sec: i32,
    pub symlink_target: String,
}

/// Reference to one block of file content stored on a volume server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileChunk {
    pub file_id: String,
    pub offset: i64,
    pub size: u64,
    pub mtime: i64,
    pub e_tag: String,
}

/// Metadata of one named object as stored by the filer.
///
/// Names that share one underlying file carry the same non-empty `hard_link_id`;
/// `hard_link_counter` is the number of names in that group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_directory: bool,
    pub attributes: FuseAttributes,
    pub chunks: Vec<FileChunk>,
    pub extended: HashMap<String, Vec<u8>>,
    pub hard_link_id: Vec<u8>,
    pub hard_link_counter: i32,
}

impl Entry {
    pub fn new_file(name: impl Into<String>, perm: u32) -> Self {
        Self::new(name, false, S_IFREG | FileMode::perm(perm))
    }

    pub fn new_dir(name: impl Into<String>, perm: u32) -> Self {
        Self::new(name, true, S_IFDIR | FileMode::perm(perm))
    }

    fn new(name: impl Into<String>, is_directory: bool, file_mode: u32) -> Self {
        let now = LocalTime::secs();
        Self {
            name: name.into(),
            is_directory,
            attributes: FuseAttributes {
                mtime: now,
                crtime: now,
                file_mode,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn default_file(name: impl Into<String>) -> Self {
        Self::new_file(name, DEFAULT_FILE_PERM)
    }

    pub fn default_dir(name: impl Into<String>) -> Self {
        Self::new_dir(name, DEFAULT_DIR_PERM)
    }

    pub fn file_type(&self) -> FileType {
        if self.is_directory {
            FileType::Dir
        } else if self.is_symlink() {
            FileType::Link
        } else {
            FileType::File
        }
    }

    pub fn is_symlink(&self) -> bool {
        FileMode::is_symlink(self.attributes.file_mode)
    }

    pub fn is_hard_link(&self) -> bool {
        !self.hard_link_id.is_empty()
    }

    pub fn file_size(&self) -> u64 {
        if self.is_symlink() {
            self.attributes.symlink_target.len() as u64
        } else {
            let chunks = self
                .chunks
                .iter()
                .map(|c| c.offset.max(0) as u64 + c.size)
                .max()
                .unwrap_or(0);
            chunks.max(self.attributes.file_size)
        }
    }

    /// The entry seen under `name`, a member of the hardlink group whose shared
    /// state is `group`. Attributes, chunks and the counter come from the group.
    pub fn hard_link_member(name: &str, group: &Entry) -> Self {
        Self {
            name: name.to_string(),
            ..group.clone()
        }
    }

    // Every name of a hardlink group reports the inode of the group,
    // any other entry the inode of its full path.
    pub fn inode(&self, path: &Path) -> u64 {
        let mut hasher = fxhash::FxHasher64::default();
        if self.is_hard_link() {
            hasher.write(&self.hard_link_id);
        } else {
            hasher.write(path.full_path().as_bytes());
        }
        // 0 and 1 are reserved by the kernel interface.
        hasher.finish().max(2)
    }
}
