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

//! Acts as the **[A]gent** for the asset subsystem.
//!
//! This module provides the tactical logic of asset management: cache lookups,
//! request merging and dependency counting. The heavy lifting (reading bytes,
//! decoding them, cloning graphs) is delegated to the lanes.

mod library;
mod metrics;
mod options;
mod resolver;

pub use library::*;
pub use options::*;
