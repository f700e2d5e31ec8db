// Copyright 2025 eraflo
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

//! Logger initialization built on `env_logger`.

use env_logger::{Builder, Env};

/// Installs the process-wide logger.
///
/// `RUST_LOG` overrides `default_filter`. Calling this twice is harmless: the
/// second call logs a warning and leaves the first logger in place.
pub fn init(default_filter: &str) {
    if Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
        .is_err()
    {
        log::warn!("Logger already initialized");
    }
}

/// Installs a logger that writes through the test harness' captured output.
pub fn init_for_tests() {
    let _ = Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
