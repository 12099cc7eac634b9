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

use crate::actor::{ActorId, ActorKind};
use crate::point_f::PointF;
use crate::position::{GridPoint, world_point_to_grid};

/// Capabilities the tile map, route finder and ray tracer query on anything
/// standing on the grid.
pub trait Creature {
    fn id(&self) -> ActorId;
    fn name(&self) -> &str;
    fn kind(&self) -> ActorKind;
    fn position(&self) -> PointF;
    fn set_position(&mut self, position: PointF);
    fn max_tiles_per_move(&self) -> u32;
    fn is_alive(&self) -> bool;

    /// Can `actor` walk across a tile this creature is standing on?
    fn is_passable_by_actor(&self, actor: &dyn Creature) -> bool;

    /// Can `actor` end its move on a tile this creature is standing on?
    fn can_share_location_with_actor(&self, actor: &dyn Creature) -> bool;

    fn is_hero(&self) -> bool {
        self.kind() == ActorKind::Hero
    }

    fn grid_point(&self) -> GridPoint {
        world_point_to_grid(self.position())
    }

    /// Whether this creature and `other` fight when they stand next to each other.
    fn is_hostile_to(&self, other: &dyn Creature) -> bool {
        if !self.is_alive() || !other.is_alive() {
            return false;
        }
        matches!(
            (self.kind(), other.kind()),
            (ActorKind::Hostile, ActorKind::Hero) | (ActorKind::Hero, ActorKind::Hostile)
        )
    }
}
