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

use filerfs_common::error::FsError;
use std::fmt;
use std::fmt::Debug;

#[derive(Debug)]
pub struct FuseError {
    pub(crate) errno: i32,
    pub(crate) error: FsError,
}

impl FuseError {
    pub fn new(errno: i32, error: FsError) -> Self {
        Self { errno, error }
    }

    pub fn errno(&self) -> i32 {
        self.errno
    }

    pub fn error(&self) -> &FsError {
        &self.error
    }
}

impl std::error::Error for FuseError {}

impl fmt::Display for FuseError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "errno {}: {}", self.errno, self.error)
    }
}

impl From<String> for FuseError {
    fn from(value: String) -> Self {
        Self::new(libc::EIO, value.into())
    }
}

impl From<&str> for FuseError {
    fn from(value: &str) -> Self {
        Self::new(libc::EIO, value.into())
    }
}

impl From<FsError> for FuseError {
    fn from(value: FsError) -> Self {
        match &value {
            FsError::AlreadyExists(_) => Self::new(libc::EEXIST, value),
            FsError::NotFound(_) => Self::new(libc::ENOENT, value),
            FsError::InvalidArgument(_) | FsError::InvalidPath(_) => Self::new(libc::EINVAL, value),
            FsError::PermissionDenied(_) => Self::new(libc::EPERM, value),
            FsError::Timeout(_) => Self::new(libc::ETIMEDOUT, value),
            FsError::Unavailable(_) => Self::new(libc::EAGAIN, value),
            FsError::IO(_) | FsError::Common(_) => Self::new(libc::EIO, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_mapping() {
        let err: FuseError = FsError::file_not_found("/d/a.txt").into();
        assert_eq!(err.errno(), libc::ENOENT);

        let err: FuseError = FsError::file_exists("/d/a.txt").into();
        assert_eq!(err.errno(), libc::EEXIST);

        let err: FuseError = FsError::invalid_argument("name").into();
        assert_eq!(err.errno(), libc::EINVAL);

        let err: FuseError = FsError::unavailable("filer down").into();
        assert_eq!(err.errno(), libc::EAGAIN);

        let err: FuseError = "broken".into();
        assert_eq!(err.errno(), libc::EIO);
        assert!(err.to_string().contains("broken"));
    }
}
