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

use crate::fs::{Dir, File, Node};
use crate::{err_fuse, FuseError, FuseResult};
use filerfs_client::filer::{CreateEntryRequest, UpdateEntryRequest};
use filerfs_common::error::FsError;
use filerfs_common::state::{Entry, HardLinkId};
use log::{debug, warn};
use std::sync::Arc;

pub struct HardLink;

impl HardLink {
    // Gives the entry a hardlink id on its first link, then counts the name being added.
    pub fn stamp(entry: &mut Entry) {
        if entry.hard_link_id.is_empty() {
            entry.hard_link_id = HardLinkId::generate();
            entry.hard_link_counter = 1;
        }
        entry.hard_link_counter = entry.hard_link_counter.saturating_add(1);
    }

    /// The entry stored under the new name: a copy of the stamped source
    /// that differs only in its name.
    pub fn new_name_entry(source: &Entry, name: &str) -> Entry {
        Entry {
            name: name.to_string(),
            is_directory: false,
            attributes: source.attributes.clone(),
            chunks: source.chunks.clone(),
            extended: source.extended.clone(),
            hard_link_id: source.hard_link_id.clone(),
            hard_link_counter: source.hard_link_counter,
        }
    }
}

impl Dir {
    /// Adds `new_name` in this directory as another name of the file `old`.
    ///
    /// The existing entry is updated on the filer before the new name is created.
    /// If the create fails the update stays committed and the call reports EIO;
    /// the cache then holds the stamped source entry and nothing for the new name.
    pub async fn link(&self, old: &Node, new_name: &str) -> FuseResult<Arc<File>> {
        let wfs = self.wfs();
        wfs.check_writable()?;
        Self::check_name(new_name)?;

        let old_file = match old.as_file() {
            Some(v) => v,
            None => {
                return err_fuse!(
                    libc::EPERM,
                    "hard link to directory {} is not allowed",
                    old.full_path()
                )
            }
        };
        debug!("link {} to {}/{}", old_file.full_path(), self.full_path(), new_name);

        // A copy owned by this request, concurrent links each start from a fresh load.
        let mut old_entry = old_file.maybe_load_entry().await?;
        if old_entry.is_directory {
            return err_fuse!(libc::EPERM, "{} is a directory", old_file.full_path());
        }
        HardLink::stamp(&mut old_entry);

        let new_entry = HardLink::new_name_entry(&old_entry, new_name);
        let mut update_req =
            UpdateEntryRequest::new(old_file.dir_path().clone(), old_entry, wfs.signature());
        let mut create_req =
            CreateEntryRequest::new(self.full_path().clone(), new_entry, wfs.signature());
        let old_path = old_file.full_path();
        let new_path = &self.full_path().join(new_name)?;

        let res = wfs
            .with_filer_client(|mut client| async move {
                {
                    let req = wfs.map_to_filer(&mut update_req);
                    client.update_entry(&req).await?;
                }
                wfs.meta_cache()
                    .update_entry(old_path, update_req.entry.clone());
                old_file.set_entry(update_req.entry);

                {
                    let req = wfs.map_to_filer(&mut create_req);
                    client.create_entry(&req).await?;
                }
                wfs.meta_cache()
                    .insert_entry(new_path, create_req.entry.clone());
                Ok::<_, FsError>(create_req.entry)
            })
            .await;

        let new_entry = match res {
            Ok(v) => v,
            Err(e) => {
                warn!("link {} to {} failed: {}", old_path, new_path, e);
                return Err(FuseError::new(libc::EIO, e));
            }
        };

        let file = self.new_file(new_name, Some(new_entry))?;
        file.maybe_load_entry().await?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filerfs_common::state::{FileChunk, HARD_LINK_ID_LEN};

    #[test]
    fn stamp() {
        let mut entry = Entry::default_file("a.txt");
        HardLink::stamp(&mut entry);
        assert_eq!(entry.hard_link_id.len(), HARD_LINK_ID_LEN);
        assert!(HardLinkId::is_hard_link_id(&entry.hard_link_id));
        assert_eq!(entry.hard_link_counter, 2);

        let id = entry.hard_link_id.clone();
        HardLink::stamp(&mut entry);
        assert_eq!(entry.hard_link_id, id);
        assert_eq!(entry.hard_link_counter, 3);
    }

    #[test]
    fn new_name_entry_copies_source() {
        let mut entry = Entry::new_file("a.txt", 0o640);
        entry.attributes.uid = 1000;
        entry.chunks.push(FileChunk {
            file_id: "3,01637037d6".to_string(),
            size: 10,
            ..Default::default()
        });
        entry.extended.insert("user.tag".to_string(), b"blue".to_vec());
        HardLink::stamp(&mut entry);

        let copy = HardLink::new_name_entry(&entry, "b.txt");
        assert_eq!(copy.name, "b.txt");
        assert_eq!(
            Entry {
                name: entry.name.clone(),
                ..copy
            },
            entry
        );
    }
}
