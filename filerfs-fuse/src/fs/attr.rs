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

use crate::FUSE_BLOCK_SIZE;
use filerfs_common::conf::FuseConf;
use filerfs_common::fs::Path;
use filerfs_common::state::{Entry, FileMode, S_IFDIR, S_IFLNK, S_IFMT, S_IFREG};

// Attributes reported to the kernel for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileAttr {
    pub ino: u64,
    pub size: u64,
    pub blocks: u64,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
    pub crtime: i64,
    pub mode: u32,
    pub nlink: u32,
    pub uid: u32,
    pub gid: u32,
    pub rdev: u32,
    pub blksize: u32,
}

impl FileAttr {
    pub fn from_entry(conf: &FuseConf, path: &Path, entry: &Entry) -> Self {
        let attr = &entry.attributes;
        let size = if entry.is_directory {
            FUSE_BLOCK_SIZE
        } else {
            entry.file_size()
        };

        let type_bits = if entry.is_directory {
            S_IFDIR
        } else if entry.is_symlink() {
            S_IFLNK
        } else {
            S_IFREG
        };
        let perm = if attr.file_mode & !S_IFMT != 0 {
            FileMode::perm(attr.file_mode)
        } else {
            0o777 & !conf.umask
        };

        // Every name of a hardlink group counts as one link.
        let nlink = if entry.is_directory {
            2
        } else {
            entry.hard_link_counter.max(1) as u32
        };

        Self {
            ino: entry.inode(path),
            size,
            blocks: size.div_ceil(512),
            atime: attr.mtime,
            mtime: attr.mtime,
            ctime: attr.mtime,
            crtime: attr.crtime,
            mode: type_bits | perm,
            nlink,
            uid: attr.uid,
            gid: attr.gid,
            rdev: 0,
            blksize: FUSE_BLOCK_SIZE as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_attr() {
        let conf = FuseConf::default();
        let path = Path::from_str("/d/a.txt").unwrap();

        let mut entry = Entry::new_file("a.txt", 0o640);
        entry.attributes.file_size = 1000;
        entry.attributes.uid = 1000;
        let attr = FileAttr::from_entry(&conf, &path, &entry);
        assert_eq!(attr.mode, S_IFREG | 0o640);
        assert_eq!(attr.nlink, 1);
        assert_eq!(attr.size, 1000);
        assert_eq!(attr.blocks, 2);
        assert_eq!(attr.uid, 1000);

        entry.hard_link_counter = 3;
        entry.hard_link_id = vec![1; 17];
        assert_eq!(FileAttr::from_entry(&conf, &path, &entry).nlink, 3);
    }

    #[test]
    fn missing_mode_uses_umask() {
        let conf = FuseConf::default();
        let path = Path::from_str("/d").unwrap();

        let mut entry = Entry::default_dir("d");
        entry.attributes.file_mode = 0;
        let attr = FileAttr::from_entry(&conf, &path, &entry);
        assert_eq!(attr.mode, S_IFDIR | 0o755);
        assert_eq!(attr.nlink, 2);
    }
}
