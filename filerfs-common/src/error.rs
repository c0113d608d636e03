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

use std::io;
use thiserror::Error;

// Errors surfaced by the filer client, the metadata cache and the mount layer.
// The mount layer maps each variant to an errno, see filerfs_fuse::FuseError.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("{0}")]
    Common(String),

    #[error("entry already exists: {0}")]
    AlreadyExists(String),

    #[error("entry not found: {0}")]
    NotFound(String),

    #[error("filer unavailable: {0}")]
    Unavailable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error(transparent)]
    IO(#[from] io::Error),
}

impl FsError {
    pub fn common(msg: impl Into<String>) -> Self {
        Self::Common(msg.into())
    }

    pub fn file_exists(path: impl AsRef<str>) -> Self {
        Self::AlreadyExists(path.as_ref().to_string())
    }

    pub fn file_not_found(path: impl AsRef<str>) -> Self {
        Self::NotFound(path.as_ref().to_string())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_path(path: impl AsRef<str>, reason: impl AsRef<str>) -> Self {
        Self::InvalidPath(format!("{}: {}", path.as_ref(), reason.as_ref()))
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    // Errors worth retrying from a different connection.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

impl From<String> for FsError {
    fn from(value: String) -> Self {
        Self::Common(value)
    }
}

impl From<&str> for FsError {
    fn from(value: &str) -> Self {
        Self::Common(value.to_string())
    }
}

impl From<toml::de::Error> for FsError {
    fn from(value: toml::de::Error) -> Self {
        Self::Common(format!("parse conf: {}", value))
    }
}
