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

use crate::error::FsError;
use crate::FsResult;
use std::fmt;

pub const SEPARATOR: &str = "/";

/// An absolute, slash separated path in the filer namespace.
/// Always normalized: no trailing separator except for the root, no empty components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    full_path: String,
}

impl Path {
    pub fn root() -> Self {
        Self {
            full_path: SEPARATOR.to_string(),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: impl AsRef<str>) -> FsResult<Self> {
        let s = s.as_ref();
        if !s.starts_with(SEPARATOR) {
            return Err(FsError::invalid_path(s, "path must be absolute"));
        }

        let mut full_path = String::with_capacity(s.len());
        for name in s.split(SEPARATOR).filter(|x| !x.is_empty()) {
            if name == "." || name == ".." {
                return Err(FsError::invalid_path(s, "relative component"));
            }
            full_path.push_str(SEPARATOR);
            full_path.push_str(name);
        }

        if full_path.is_empty() {
            Ok(Self::root())
        } else {
            Ok(Self { full_path })
        }
    }

    pub fn is_root(&self) -> bool {
        self.full_path == SEPARATOR
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    // The last component, empty for the root.
    pub fn name(&self) -> &str {
        match self.full_path.rfind(SEPARATOR) {
            Some(pos) => &self.full_path[pos + 1..],
            None => "",
        }
    }

    pub fn parent(&self) -> Option<Path> {
        if self.is_root() {
            return None;
        }

        let pos = self.full_path.rfind(SEPARATOR)?;
        if pos == 0 {
            Some(Self::root())
        } else {
            Some(Self {
                full_path: self.full_path[..pos].to_string(),
            })
        }
    }

    // Appends a single validated entry name.
    pub fn join(&self, name: impl AsRef<str>) -> FsResult<Path> {
        let name = name.as_ref();
        Self::check_name(name)?;

        let full_path = if self.is_root() {
            format!("{}{}", SEPARATOR, name)
        } else {
            format!("{}{}{}", self.full_path, SEPARATOR, name)
        };
        Ok(Self { full_path })
    }

    pub fn check_name(name: &str) -> FsResult<()> {
        if name.is_empty() || name == "." || name == ".." || name.contains(SEPARATOR) {
            Err(FsError::invalid_argument(format!(
                "invalid entry name: {:?}",
                name
            )))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_path)
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.full_path
    }
}

#[cfg(test)]
mod tests {
    use super::Path;

    #[test]
    fn normalize() {
        assert_eq!(Path::from_str("/").unwrap().full_path(), "/");
        assert_eq!(Path::from_str("//d//a.txt/").unwrap().full_path(), "/d/a.txt");
        assert!(Path::from_str("d/a.txt").is_err());
        assert!(Path::from_str("/d/../a.txt").is_err());
    }

    #[test]
    fn parent_and_name() {
        let path = Path::from_str("/d/a.txt").unwrap();
        assert_eq!(path.name(), "a.txt");
        assert_eq!(path.parent().unwrap().full_path(), "/d");
        assert_eq!(path.parent().unwrap().parent().unwrap(), Path::root());
        assert!(Path::root().parent().is_none());
        assert_eq!(Path::root().name(), "");
    }

    #[test]
    fn join() {
        let root = Path::root();
        assert_eq!(root.join("d").unwrap().full_path(), "/d");
        assert_eq!(
            root.join("d").unwrap().join("b.txt").unwrap().full_path(),
            "/d/b.txt"
        );
        assert!(root.join("a/b").is_err());
        assert!(root.join("..").is_err());
        assert!(root.join("").is_err());
    }
}
