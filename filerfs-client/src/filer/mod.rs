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

mod request;
pub use self::request::*;

mod filer_client;
pub use self::filer_client::{FilerClient, FilerConnector};

mod client_pool;
pub use self::client_pool::{FilerClientHandle, FilerClientPool};

mod mem_filer;
pub use self::mem_filer::MemFiler;
