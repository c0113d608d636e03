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

use crate::fs::{Dir, File};
use crate::{err_fuse, FuseError, FuseResult};
use filerfs_client::filer::CreateEntryRequest;
use filerfs_common::common::LocalTime;
use filerfs_common::error::FsError;
use filerfs_common::state::{Entry, FileMode, FuseAttributes};
use log::{debug, warn};
use std::sync::Arc;

pub struct Symlink;

impl Symlink {
    pub fn new_entry(name: &str, target: &str, uid: u32, gid: u32, umask: u32) -> Entry {
        let now = LocalTime::secs();
        Entry {
            name: name.to_string(),
            is_directory: false,
            attributes: FuseAttributes {
                mtime: now,
                crtime: now,
                file_mode: FileMode::symlink(umask),
                uid,
                gid,
                symlink_target: target.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    // Target of a loaded symlink entry, EINVAL for anything else.
    pub fn read_target(entry: &Entry) -> FuseResult<&str> {
        if !entry.is_symlink() {
            return err_fuse!(libc::EINVAL, "{} is not a symlink", entry.name);
        }
        Ok(entry.attributes.symlink_target.as_str())
    }
}

impl Dir {
    /// Creates the symlink `name` pointing at `target`. The returned node holds the
    /// entry as sent to the filer, it is not read back.
    pub async fn symlink(
        &self,
        name: &str,
        target: &str,
        uid: u32,
        gid: u32,
    ) -> FuseResult<Arc<File>> {
        let wfs = self.wfs();
        wfs.check_writable()?;
        Self::check_name(name)?;
        debug!("symlink {}/{} -> {}", self.full_path(), name, target);

        let entry = Symlink::new_entry(name, target, uid, gid, wfs.conf().umask);
        let mut req = CreateEntryRequest::new(self.full_path().clone(), entry, wfs.signature());
        let path = &self.full_path().join(name)?;

        let res = wfs
            .with_filer_client(|mut client| async move {
                {
                    let scoped = wfs.map_to_filer(&mut req);
                    client.create_entry(&scoped).await?;
                }
                wfs.meta_cache().insert_entry(path, req.entry.clone());
                Ok::<_, FsError>(req.entry)
            })
            .await;

        match res {
            Ok(entry) => self.new_file(name, Some(entry)),
            Err(e) => {
                warn!("symlink {} failed: {}", path, e);
                Err(FuseError::new(libc::EIO, e))
            }
        }
    }
}

impl File {
    pub async fn readlink(&self) -> FuseResult<String> {
        let entry = self.maybe_load_entry().await?;
        let target = Symlink::read_target(&entry)?;
        debug!("readlink {} -> {}", self.full_path(), target);
        Ok(target.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filerfs_common::state::S_IFLNK;

    #[test]
    fn symlink_entry() {
        let entry = Symlink::new_entry("link1", "/target/path", 1000, 1000, 0o022);
        assert!(!entry.is_directory);
        assert!(entry.is_symlink());
        assert!(entry.hard_link_id.is_empty());
        assert_eq!(entry.attributes.file_mode, S_IFLNK | 0o755);
        assert_eq!(entry.attributes.mtime, entry.attributes.crtime);
        assert_eq!(Symlink::read_target(&entry).unwrap(), "/target/path");
    }

    #[test]
    fn read_target_of_plain_file() {
        let entry = Entry::new_file("a.txt", 0o644);
        let err = Symlink::read_target(&entry).unwrap_err();
        assert_eq!(err.errno(), libc::EINVAL);
    }
}
