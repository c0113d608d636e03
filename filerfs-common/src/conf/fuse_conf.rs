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

use crate::fs::Path;
use crate::state::PERM_MASK;
use crate::utils::UidGidMapper;
use crate::{err_box, FsResult};
use serde::{Deserialize, Serialize};

/// Mount level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FuseConf {
    // Filer directory exposed as the root of the mount.
    pub fs_path: String,

    // Reject every mutation with EPERM.
    pub read_only: bool,

    pub umask: u32,

    // "local:filer,local:filer" pairs, see UidGidMapper.
    pub uid_map: String,
    pub gid_map: String,

    // Stamped on every mutation so change feeds can skip our own writes.
    // A random value is picked at mount time when unset.
    pub signature: Option<i32>,
}

impl FuseConf {
    pub fn init(&mut self) -> FsResult<()> {
        if self.umask > PERM_MASK {
            return err_box!("invalid umask {:o}", self.umask);
        }
        self.root_path()?;
        self.id_mapper()?;
        Ok(())
    }

    pub fn root_path(&self) -> FsResult<Path> {
        Path::from_str(&self.fs_path)
    }

    pub fn id_mapper(&self) -> FsResult<UidGidMapper> {
        UidGidMapper::new(&self.uid_map, &self.gid_map)
    }
}

impl Default for FuseConf {
    fn default() -> Self {
        Self {
            fs_path: "/".to_string(),
            read_only: false,
            umask: 0o022,
            uid_map: "".to_string(),
            gid_map: "".to_string(),
            signature: None,
        }
    }
}
