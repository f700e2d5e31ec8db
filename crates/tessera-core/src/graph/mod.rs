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

//! The dynamic object graph that assets deserialize into.
//!
//! Objects, arrays and foreign handles have reference identity: cloning a
//! [`Value`] that holds one of them shares the referent, it never copies it.
//! Graphs may be cyclic.

mod class;
mod foreign;
mod object;
mod slot;
mod value;

pub use class::*;
pub use foreign::*;
pub use object::*;
pub use slot::*;
pub use value::*;
