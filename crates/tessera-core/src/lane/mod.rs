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

//! # Lane Abstraction
//!
//! The base trait for every swappable strategy used by the asset library.
//!
//! A **Lane** encapsulates one algorithmic approach to a domain task. The library
//! composes three of them:
//!
//! - `RawLoader: Lane` fetches bytes from a location.
//! - `Deserializer: Lane` turns bytes into an object graph.
//! - The graph instantiator clones live graphs.
//!
//! Strategies identify themselves so the library can log which one served a request.

/// Common interface shared by all lane types.
pub trait Lane {
    /// Human-readable name of the strategy (e.g. `"FsRawLoader"`).
    fn strategy_name(&self) -> &'static str;

    /// The domain this lane belongs to.
    fn lane_kind(&self) -> LaneKind;
}

/// Classification of lane types, used for routing and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Asset fetching and decoding.
    Asset,
    /// Object-graph instantiation.
    Scene,
}

impl std::fmt::Display for LaneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaneKind::Asset => write!(f, "Asset"),
            LaneKind::Scene => write!(f, "Scene"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullLane;

    impl Lane for NullLane {
        fn strategy_name(&self) -> &'static str {
            "Null"
        }

        fn lane_kind(&self) -> LaneKind {
            LaneKind::Scene
        }
    }

    #[test]
    fn test_lane_identity() {
        let lane: Box<dyn Lane> = Box::new(NullLane);
        assert_eq!(lane.strategy_name(), "Null");
        assert_eq!(lane.lane_kind().to_string(), "Scene");
    }
}
