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

use log::debug;
use rand::Rng;
use std::collections::HashMap;

use crate::creature::Creature;
use crate::point_f::PointF;
use crate::position::{Direction, GridPoint, grid_point_to_world_point};
use crate::tile_map::TileMap;

/// Waypoints after the start point, ending on the destination.
pub type Route = Vec<GridPoint>;

/// Shortest known route to every reachable destination.
pub type Routes = HashMap<GridPoint, Route>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    fn delta(self, from: GridPoint, to: GridPoint) -> i32 {
        match self {
            Axis::X => (to.x - from.x).signum(),
            Axis::Y => (to.y - from.y).signum(),
        }
    }

    fn step(self, from: GridPoint, delta: i32) -> GridPoint {
        match self {
            Axis::X => from.offset(delta, 0),
            Axis::Y => from.offset(0, delta),
        }
    }
}

/// Route searches for one actor over one tile map.
pub struct RouteFinder<'a> {
    tile_map: &'a TileMap,
    actor: &'a dyn Creature,
}

impl<'a> RouteFinder<'a> {
    pub fn new(tile_map: &'a TileMap, actor: &'a dyn Creature) -> Self {
        Self { tile_map, actor }
    }

    fn push_branches(stack: &mut Vec<(GridPoint, u32, Route)>, from: GridPoint, remaining: u32, path: &Route) {
        // Reversed so the pops come out up, right, down, left.
        for direction in Direction::CARDINALS.iter().rev() {
            let next = from.step(*direction);
            let mut branch = path.clone();
            branch.push(next);
            stack.push((next, remaining, branch));
        }
    }

    /// Every destination reachable within `max_moves` orthogonal steps.
    ///
    /// Depth-first, trying up, right, down, left. Tiles only need to be
    /// passable to be crossed; a route is kept only when its last tile can
    /// also be occupied. Equal-length routes keep whichever was found first.
    pub fn get_all_routes_from(&self, start: GridPoint, max_moves: u32) -> Routes {
        let mut routes = Routes::new();
        if max_moves == 0 {
            return routes;
        }

        // Shortest path length at which each point has been expanded. Reaching
        // it again no shorter cannot improve any route.
        let mut expanded_at: HashMap<GridPoint, usize> = HashMap::new();
        let mut stack = Vec::new();
        Self::push_branches(&mut stack, start, max_moves - 1, &Route::new());

        while let Some((point, remaining, path)) = stack.pop() {
            if point == start {
                continue;
            }
            if !self.tile_map.is_grid_point_passable_by_actor(point, self.actor) {
                continue;
            }
            if expanded_at.get(&point).is_some_and(|&length| length <= path.len()) {
                continue;
            }
            expanded_at.insert(point, path.len());

            if self.tile_map.can_grid_point_be_occupied_by_actor(point, self.actor) {
                let shorter = routes.get(&point).is_none_or(|known| path.len() < known.len());
                if shorter {
                    routes.insert(point, path.clone());
                }
            }

            if remaining > 0 {
                Self::push_branches(&mut stack, point, remaining - 1, &path);
            }
        }

        routes
    }

    /// The cell next to `target` an actor coming from `start` should head for.
    /// `None` when `start` already is that cell.
    fn adjacent_goal(&self, start: GridPoint, target: GridPoint) -> Option<GridPoint> {
        let dx = start.x - target.x;
        let dy = start.y - target.y;
        let (ox, oy) = if dx.abs() >= dy.abs() {
            (dx.signum(), 0)
        } else {
            (0, dy.signum())
        };
        if (ox, oy) == (0, 0) {
            return None;
        }

        let goal = target.offset(ox, oy);
        if goal == start {
            return None;
        }
        if self.tile_map.can_grid_point_be_occupied_by_actor(goal, self.actor) {
            return Some(goal);
        }

        let rotated = target.offset(-oy, ox);
        if rotated == start {
            return None;
        }
        if self.tile_map.can_grid_point_be_occupied_by_actor(rotated, self.actor) {
            Some(rotated)
        } else {
            Some(goal)
        }
    }

    /// Cheap, non-optimal route for computer actors closing in on `target`.
    ///
    /// Heads for a cell next to the target, alternating between the x and y
    /// gaps and switching axis when a step is blocked. The first axis is
    /// random. Two failed steps in a row end the search, and whatever progress
    /// was made is returned. Waypoints are world points at each turn and at
    /// the destination.
    pub fn get_dumb_route_next_to<R: Rng + ?Sized>(
        &self,
        start: GridPoint,
        target: GridPoint,
        max_moves: u32,
        rng: &mut R,
    ) -> Vec<PointF> {
        let Some(goal) = self.adjacent_goal(start, target) else {
            return Vec::new();
        };

        let mut axis = if rng.gen_bool(0.5) { Axis::X } else { Axis::Y };
        let mut current = start;
        let mut steps: Vec<(GridPoint, Axis)> = Vec::new();
        let mut failures = 0;
        let mut turned_at_start = false;

        while (steps.len() as u32) < max_moves && current != goal {
            let delta = axis.delta(current, goal);
            if delta == 0 {
                axis = axis.other();
                continue;
            }

            let next = axis.step(current, delta);
            if self.tile_map.is_grid_point_passable_by_actor(next, self.actor) {
                steps.push((next, axis));
                current = next;
                failures = 0;
            } else {
                failures += 1;
                if failures >= 2 {
                    break;
                }
                if steps.is_empty() {
                    turned_at_start = true;
                }
                axis = axis.other();
            }
        }

        while let Some(&(last, _)) = steps.last() {
            if self.tile_map.can_grid_point_be_occupied_by_actor(last, self.actor) {
                break;
            }
            debug!("{} cannot stop on {last}, backing off.", self.actor.name());
            steps.pop();
        }
        if steps.is_empty() {
            return Vec::new();
        }

        let mut waypoints = Vec::new();
        if turned_at_start {
            waypoints.push(grid_point_to_world_point(start));
        }
        for (index, (point, axis)) in steps.iter().enumerate() {
            let turns_here = steps.get(index + 1).is_none_or(|(_, next_axis)| next_axis != axis);
            if turns_here {
                waypoints.push(grid_point_to_world_point(*point));
            }
        }
        waypoints
    }
}
