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

use crate::filer::{CreateEntryRequest, UpdateEntryRequest};
use async_trait::async_trait;
use filerfs_common::fs::Path;
use filerfs_common::state::Entry;
use filerfs_common::FsResult;

/// One connection to the filer. Each call is a single round trip.
///
/// Expected errors:
/// - `create_entry`: `AlreadyExists` when the name is taken.
/// - `update_entry`, `lookup_entry`: `NotFound` when there is no such entry.
/// - any call: `Unavailable` or `Timeout` when the filer cannot be reached.
#[async_trait]
pub trait FilerClient: Send + Sync {
    async fn create_entry(&self, req: &CreateEntryRequest) -> FsResult<()>;

    async fn update_entry(&self, req: &UpdateEntryRequest) -> FsResult<()>;

    async fn lookup_entry(&self, directory: &Path, name: &str) -> FsResult<Entry>;
}

/// Opens new filer connections for the client pool.
#[async_trait]
pub trait FilerConnector: Send + Sync {
    async fn connect(&self) -> FsResult<Box<dyn FilerClient>>;
}
