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

mod attr;
pub use self::attr::FileAttr;

mod id_scope;
pub use self::id_scope::FilerIdScope;

mod filer_fs;
pub use self::filer_fs::FilerFs;

mod node;
pub use self::node::Node;

mod dir;
pub use self::dir::Dir;

mod file;
pub use self::file::File;

mod hard_link;
pub use self::hard_link::HardLink;

mod symlink;
pub use self::symlink::Symlink;
