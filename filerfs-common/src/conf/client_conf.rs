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

use crate::common::DurationUnit;
use crate::FsResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Filer connection and metadata cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConf {
    // Timeout of a single create/update/lookup call.
    #[serde(skip)]
    pub rpc_timeout: Duration,
    #[serde(alias = "rpc_timeout")]
    pub rpc_timeout_str: String,

    // Number of idle filer connections kept for reuse.
    pub conn_pool_size: usize,

    // Maximum number of entries held by the local metadata cache.
    pub meta_cache_capacity: u64,

    // Cached entries are dropped after this long and re-read from the filer on the next miss.
    #[serde(skip)]
    pub meta_cache_ttl: Duration,
    #[serde(alias = "meta_cache_ttl")]
    pub meta_cache_ttl_str: String,
}

impl ClientConf {
    pub fn init(&mut self) -> FsResult<()> {
        self.rpc_timeout = DurationUnit::from_str(&self.rpc_timeout_str)?.as_duration();
        self.meta_cache_ttl = DurationUnit::from_str(&self.meta_cache_ttl_str)?.as_duration();
        Ok(())
    }
}

impl Default for ClientConf {
    fn default() -> Self {
        Self {
            rpc_timeout: Default::default(),
            rpc_timeout_str: "30s".to_string(),

            conn_pool_size: 16,

            meta_cache_capacity: 1_000_000,

            meta_cache_ttl: Default::default(),
            meta_cache_ttl_str: "10m".to_string(),
        }
    }
}
