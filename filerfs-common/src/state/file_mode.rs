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

// POSIX file type bits carried in the upper part of `file_mode`.
pub const S_IFMT: u32 = 0o170000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFLNK: u32 = 0o120000;

pub const PERM_MASK: u32 = 0o7777;

pub const DEFAULT_FILE_PERM: u32 = 0o666;
pub const DEFAULT_DIR_PERM: u32 = 0o777;
pub const SYMLINK_PERM: u32 = 0o777;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Dir,
    File,
    Link,
}

pub struct FileMode;

impl FileMode {
    pub fn file_type(mode: u32) -> Option<FileType> {
        match mode & S_IFMT {
            S_IFDIR => Some(FileType::Dir),
            S_IFREG => Some(FileType::File),
            S_IFLNK => Some(FileType::Link),
            _ => None,
        }
    }

    pub fn is_symlink(mode: u32) -> bool {
        mode & S_IFMT == S_IFLNK
    }

    pub fn perm(mode: u32) -> u32 {
        mode & PERM_MASK
    }

    // Mode of a new symlink: world accessible, then narrowed by the mount umask.
    pub fn symlink(umask: u32) -> u32 {
        (SYMLINK_PERM | S_IFLNK) & !(umask & PERM_MASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symlink_mode_applies_umask() {
        let mode = FileMode::symlink(0o022);
        assert!(FileMode::is_symlink(mode));
        assert_eq!(FileMode::perm(mode), 0o755);
        assert_eq!(FileMode::file_type(mode), Some(FileType::Link));

        // A umask must never clear the type bits.
        assert!(FileMode::is_symlink(FileMode::symlink(0o177777)));
    }

    #[test]
    fn regular_file_is_not_symlink() {
        assert!(!FileMode::is_symlink(S_IFREG | 0o644));
        assert!(!FileMode::is_symlink(0o644));
        assert_eq!(FileMode::file_type(0o644), None);
    }
}
