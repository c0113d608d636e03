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

use crate::common::LogConf;
use crate::conf::{ClientConf, FuseConf};
use crate::FsResult;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConf {
    pub client: ClientConf,
    pub fuse: FuseConf,
    pub log: LogConf,
}

impl ClusterConf {
    // Load a toml configuration file. Missing keys take their default values.
    pub fn from(path: impl AsRef<str>) -> FsResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> FsResult<Self> {
        let mut conf: ClusterConf = toml::from_str(content)?;
        conf.init()?;
        Ok(conf)
    }

    pub fn init(&mut self) -> FsResult<()> {
        self.client.init()?;
        self.fuse.init()?;
        Ok(())
    }

    pub fn print(&self) {
        info!("client conf: {:?}", self.client);
        info!("fuse conf: {:?}", self.fuse);
    }
}

#[cfg(test)]
mod tests {
    use super::ClusterConf;
    use std::time::Duration;

    #[test]
    fn defaults() {
        let conf = ClusterConf::from_toml("").unwrap();
        assert!(!conf.fuse.read_only);
        assert_eq!(conf.fuse.umask, 0o022);
        assert_eq!(conf.client.rpc_timeout, Duration::from_secs(30));
        assert_eq!(conf.client.meta_cache_ttl, Duration::from_secs(600));
        assert!(conf.fuse.id_mapper().unwrap().is_empty());
    }

    #[test]
    fn parse_file_content() {
        let conf = ClusterConf::from_toml(
            r#"
            [client]
            rpc_timeout = "5s"
            meta_cache_ttl = "1m"

            [fuse]
            read_only = true
            umask = 63
            uid_map = "1000:2000"
            signature = 42

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(conf.client.conn_pool_size, 16);
        assert_eq!(conf.client.rpc_timeout, Duration::from_secs(5));
        assert_eq!(conf.client.meta_cache_ttl, Duration::from_secs(60));
        assert!(conf.fuse.read_only);
        assert_eq!(conf.fuse.umask, 0o077);
        assert_eq!(conf.fuse.signature, Some(42));
        assert_eq!(conf.log.level, "debug");
        assert!(!conf.fuse.id_mapper().unwrap().is_empty());
    }

    #[test]
    fn reject_bad_values() {
        assert!(ClusterConf::from_toml("[fuse]\numask = 4096").is_err());
        assert!(ClusterConf::from_toml("[fuse]\nuid_map = \"1000\"").is_err());
        assert!(ClusterConf::from_toml("[fuse]\nfs_path = \"relative\"").is_err());
        assert!(ClusterConf::from_toml("[client]\nrpc_timeout = \"5y\"").is_err());
        assert!(ClusterConf::from_toml("[client]\nrpc_timeout = \"999999999999999999d\"").is_err());
    }

    #[test]
    fn load_conf_file() {
        let path = std::env::temp_dir().join(format!("filerfs-conf-{}.toml", std::process::id()));
        std::fs::write(&path, "[fuse]\nfs_path = \"/data\"\nsignature = 7\n").unwrap();

        let conf = ClusterConf::from(path.to_string_lossy()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(conf.fuse.root_path().unwrap().full_path(), "/data");
        assert_eq!(conf.fuse.signature, Some(7));
        conf.print();

        assert!(ClusterConf::from(path.to_string_lossy()).is_err());
    }
}
