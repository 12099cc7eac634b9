// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

pub mod actor;
pub mod campaign;
pub mod combat;
pub mod config;
pub mod creature;
pub mod error;
pub mod maps;
pub mod point_f;
pub mod position;
pub mod tile;
pub mod tile_map;
pub mod turns;

pub use actor::{Actor, ActorKind, ActorRef, ActorTemplate};
pub use campaign::{ActorSpawn, Campaign, SceneDefinition};
pub use combat::MeleeCombat;
pub use config::TurnConfig;
pub use creature::Creature;
pub use error::{CampaignError, MapError, TurnError};
pub use maps::{RayTracer, RouteFinder, World, WorldRef};
pub use point_f::PointF;
pub use position::{GRID_SIZE, GridPoint, GridRect};
pub use tile_map::TileMap;
pub use turns::{Dispatch, Fighting, Stage, TurnEvent, TurnManager, TurnState};
