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
use std::time::Duration;

/// A duration written the way configuration files write it: `500ms`, `10s`, `5m`, `6h`, `1d`.
/// A bare number is read as seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationUnit {
    millis: u64,
}

impl DurationUnit {
    pub fn new(millis: u64) -> Self {
        Self { millis }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> FsResult<Self> {
        let s = s.trim().to_lowercase();
        if s.is_empty() {
            return Err(FsError::invalid_argument("empty duration"));
        }

        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        let (num, unit) = s.split_at(split);
        let num: u64 = num
            .parse()
            .map_err(|_| FsError::invalid_argument(format!("invalid duration: {}", s)))?;

        let factor = match unit.trim() {
            "ms" => 1,
            "" | "s" => 1000,
            "m" | "min" => 60 * 1000,
            "h" => 60 * 60 * 1000,
            "d" => 24 * 60 * 60 * 1000,
            other => {
                return Err(FsError::invalid_argument(format!(
                    "invalid duration unit {} in {}",
                    other, s
                )))
            }
        };

        match num.checked_mul(factor) {
            Some(millis) => Ok(Self::new(millis)),
            None => Err(FsError::invalid_argument(format!("duration out of range: {}", s))),
        }
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }
}

#[cfg(test)]
mod tests {
    use super::DurationUnit;
    use std::time::Duration;

    #[test]
    fn parse() {
        assert_eq!(
            DurationUnit::from_str("500ms").unwrap().as_duration(),
            Duration::from_millis(500)
        );
        assert_eq!(DurationUnit::from_str("10s").unwrap().as_millis(), 10_000);
        assert_eq!(DurationUnit::from_str("30").unwrap().as_millis(), 30_000);
        assert_eq!(DurationUnit::from_str("5m").unwrap().as_millis(), 300_000);
        assert_eq!(DurationUnit::from_str("1H").unwrap().as_millis(), 3_600_000);
    }

    #[test]
    fn reject_bad_input() {
        assert!(DurationUnit::from_str("").is_err());
        assert!(DurationUnit::from_str("s").is_err());
        assert!(DurationUnit::from_str("10y").is_err());
        assert!(DurationUnit::from_str("999999999999999999d").is_err());
        assert!(DurationUnit::from_str("99999999999999999999").is_err());
    }
}
