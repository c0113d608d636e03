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

pub mod fs;

mod fuse_error;
pub use self::fuse_error::FuseError;

pub type FuseResult<T> = Result<T, FuseError>;

pub const FUSE_MAX_NAME_LENGTH: usize = 255;

pub const FUSE_BLOCK_SIZE: u64 = 4096;

#[macro_export]
macro_rules! err_fuse {
    ($errno:expr) => {
        Err($crate::FuseError::new($errno, format!("errno {}", $errno).into()))
    };

    ($errno:expr, $f:tt) => {
        Err($crate::FuseError::new($errno, format!($f).into()))
    };

    ($errno:expr, $f:expr, $($arg:expr),+) => {
        Err($crate::FuseError::new($errno, format!($f, $($arg),+).into()))
    };
}
