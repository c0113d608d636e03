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

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_INIT: OnceCell<()> = OnceCell::new();
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConf {
    pub level: String,

    // Empty means log to stdout.
    pub log_dir: String,

    pub file_name: String,

    pub display_thread: bool,

    pub display_position: bool,
}

impl Default for LogConf {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: "".to_string(),
            file_name: "filerfs-fuse.log".to_string(),
            display_thread: true,
            display_position: false,
        }
    }
}

// Installs the process wide tracing subscriber. Records emitted through the `log`
// macros are forwarded to it, so crates only ever log with `log::info!` and friends.
pub struct Logger;

impl Logger {
    pub fn init(conf: LogConf) {
        LOG_INIT.get_or_init(|| Self::init0(&conf));
    }

    // Stdout logging at debug level, for tests and local runs.
    #[allow(clippy::should_implement_trait)]
    pub fn default() {
        let conf = LogConf {
            level: "debug".to_string(),
            ..Default::default()
        };
        Self::init(conf)
    }

    fn parse_level(level: &str) -> Level {
        Level::from_str(level.trim()).unwrap_or(Level::INFO)
    }

    fn to_log_filter(level: Level) -> log::LevelFilter {
        match level {
            Level::TRACE => log::LevelFilter::Trace,
            Level::DEBUG => log::LevelFilter::Debug,
            Level::INFO => log::LevelFilter::Info,
            Level::WARN => log::LevelFilter::Warn,
            Level::ERROR => log::LevelFilter::Error,
        }
    }

    fn init0(conf: &LogConf) {
        let level = Self::parse_level(&conf.level);
        if let Err(e) = tracing_log::LogTracer::init_with_filter(Self::to_log_filter(level)) {
            eprintln!("log bridge already installed: {}", e);
        }

        let builder = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_thread_names(conf.display_thread)
            .with_file(conf.display_position)
            .with_line_number(conf.display_position);

        let res = if conf.log_dir.is_empty() {
            tracing::subscriber::set_global_default(builder.finish())
        } else {
            let appender = tracing_appender::rolling::daily(&conf.log_dir, &conf.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            tracing::subscriber::set_global_default(
                builder.with_ansi(false).with_writer(writer).finish(),
            )
        };

        if let Err(e) = res {
            eprintln!("tracing subscriber already installed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Logger;
    use tracing::Level;

    #[test]
    fn parse_level_falls_back_to_info() {
        assert_eq!(Logger::parse_level("debug"), Level::DEBUG);
        assert_eq!(Logger::parse_level(" WARN "), Level::WARN);
        assert_eq!(Logger::parse_level("verbose"), Level::INFO);
    }
}
