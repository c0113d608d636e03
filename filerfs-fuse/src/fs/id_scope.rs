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

use filerfs_client::filer::EntryRequest;
use filerfs_common::utils::UidGidMapper;
use std::ops::Deref;

/// Keeps the entry of a request in filer id space for as long as the scope lives.
/// Dropping the scope maps the ids back, on success, on error and on unwind alike.
pub struct FilerIdScope<'a, R: EntryRequest> {
    mapper: &'a UidGidMapper,
    req: &'a mut R,
}

impl<'a, R: EntryRequest> FilerIdScope<'a, R> {
    pub fn new(mapper: &'a UidGidMapper, req: &'a mut R) -> Self {
        mapper.map_to_filer(req.entry_mut());
        Self { mapper, req }
    }
}

impl<R: EntryRequest> Deref for FilerIdScope<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &*self.req
    }
}

impl<R: EntryRequest> Drop for FilerIdScope<'_, R> {
    fn drop(&mut self) {
        self.mapper.map_to_local(self.req.entry_mut());
    }
}
