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

use bitflags::bitflags;
use log::debug;
use std::collections::HashSet;
use std::rc::Rc;

use crate::position::{GridPoint, GridRect};
use crate::tile_map::TileMap;

bitflags! {
    /// Eight-point compass heading of a ray, as a combination of the four cardinals.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Compass: u8 {
        const NORTH = 0b0001;
        const EAST  = 0b0010;
        const SOUTH = 0b0100;
        const WEST  = 0b1000;
    }
}

impl Compass {
    pub fn from_delta(dx: i32, dy: i32) -> Self {
        let mut compass = Compass::empty();
        compass.set(Compass::NORTH, dy < 0);
        compass.set(Compass::SOUTH, dy > 0);
        compass.set(Compass::EAST, dx > 0);
        compass.set(Compass::WEST, dx < 0);
        compass
    }

    fn signs(self) -> (i32, i32) {
        let sx = if self.contains(Compass::EAST) {
            1
        } else if self.contains(Compass::WEST) {
            -1
        } else {
            0
        };
        let sy = if self.contains(Compass::SOUTH) {
            1
        } else if self.contains(Compass::NORTH) {
            -1
        } else {
            0
        };
        (sx, sy)
    }

    /// Neighbour offsets lying ahead of a ray with this heading: never behind
    /// it on either axis, and at least partly forward.
    pub fn corner_offsets(self) -> Vec<(i32, i32)> {
        let (sx, sy) = self.signs();
        let mut offsets = Vec::new();
        for ox in -1..=1 {
            for oy in -1..=1 {
                if (ox, oy) == (0, 0) {
                    continue;
                }
                if sx != 0 && ox != 0 && ox != sx {
                    continue;
                }
                if sy != 0 && oy != 0 && oy != sy {
                    continue;
                }
                if ox * sx + oy * sy > 0 {
                    offsets.push((ox, oy));
                }
            }
        }
        offsets
    }
}

/// Fog of war: the grid points visible from the hero.
#[derive(Debug, Default)]
pub struct RayTracer {
    last_start: Option<GridPoint>,
    last_bounds: Option<GridRect>,
    reached: Rc<HashSet<GridPoint>>,
}

impl RayTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Casts one ray from `start` to every cell on the map's edge.
    ///
    /// The result is cached. As long as neither `start` nor the map bounds
    /// change, the same set is handed back without tracing again.
    pub fn find_reached_tiles(&mut self, tile_map: &TileMap, start: GridPoint) -> Rc<HashSet<GridPoint>> {
        let bounds = tile_map.bounds();
        if self.last_start == Some(start) && self.last_bounds == Some(bounds) {
            debug!("Rays from {start} are unchanged.");
            return Rc::clone(&self.reached);
        }

        let mut reached = HashSet::new();
        if !bounds.is_empty() && bounds.contains(&start) {
            reached.insert(start);
            for target in bounds.perimeter() {
                Self::cast(tile_map, start, target, &mut reached);
            }
        }

        self.last_start = Some(start);
        self.last_bounds = Some(bounds);
        self.reached = Rc::new(reached);
        Rc::clone(&self.reached)
    }

    fn cast(tile_map: &TileMap, start: GridPoint, target: GridPoint, reached: &mut HashSet<GridPoint>) {
        let dx = target.x - start.x;
        let dy = target.y - start.y;
        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            return;
        }
        let corners = Compass::from_delta(dx, dy).corner_offsets();
        let x_major = dx.abs() >= dy.abs();

        for i in 1..=steps {
            let minor = |delta: i32| (delta as f32 * i as f32 / steps as f32).round() as i32;
            let point = if x_major {
                GridPoint::new(start.x + dx.signum() * i, start.y + minor(dy))
            } else {
                GridPoint::new(start.x + minor(dx), start.y + dy.signum() * i)
            };

            if tile_map.get_tile(point).is_none() {
                break;
            }
            reached.insert(point);

            // Walls diagonal to the ray would otherwise flicker at the edge of the lit area.
            for (ox, oy) in &corners {
                let neighbour = point.offset(*ox, *oy);
                if tile_map.get_tile(neighbour).is_some() && !tile_map.is_see_through(neighbour) {
                    reached.insert(neighbour);
                }
            }

            if !tile_map.is_see_through(point) {
                break;
            }
        }
    }

    pub fn is_grid_point_in_rays(&self, grid_point: GridPoint) -> bool {
        self.reached.contains(&grid_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_offsets_point_ahead() {
        let mut east = Compass::EAST.corner_offsets();
        east.sort();
        assert_eq!(east, vec![(1, -1), (1, 0), (1, 1)]);

        let mut north_east = (Compass::NORTH | Compass::EAST).corner_offsets();
        north_east.sort();
        assert_eq!(north_east, vec![(0, -1), (1, -1), (1, 0)]);
    }

    #[test]
    fn walls_of_a_closed_room_are_all_visible() {
        let map = TileMap::from_plan(&["#####", "E...#", "#...X", "#####"]).unwrap();
        let mut tracer = RayTracer::new();
        let reached = tracer.find_reached_tiles(&map, GridPoint::new(2, 1));
        for tile in map.tiles() {
            assert!(reached.contains(&tile.grid_point()), "{} not reached", tile.grid_point());
        }
    }

    #[test]
    fn walls_cast_shadows() {
        let map = TileMap::from_plan(&["E.#.X"]).unwrap();
        let mut tracer = RayTracer::new();
        tracer.find_reached_tiles(&map, GridPoint::new(1, 0));
        assert!(tracer.is_grid_point_in_rays(GridPoint::new(0, 0)));
        assert!(tracer.is_grid_point_in_rays(GridPoint::new(1, 0)));
        assert!(tracer.is_grid_point_in_rays(GridPoint::new(2, 0)));
        assert!(!tracer.is_grid_point_in_rays(GridPoint::new(3, 0)));
        assert!(!tracer.is_grid_point_in_rays(GridPoint::new(4, 0)));
    }

    #[test]
    fn void_cells_stay_dark() {
        let map = TileMap::from_plan(&["E. .X"]).unwrap();
        let mut tracer = RayTracer::new();
        tracer.find_reached_tiles(&map, GridPoint::new(1, 0));
        assert!(!tracer.is_grid_point_in_rays(GridPoint::new(2, 0)));
        assert!(!tracer.is_grid_point_in_rays(GridPoint::new(3, 0)));
    }

    #[test]
    fn unchanged_start_reuses_the_cached_set() {
        let map = TileMap::from_plan(&["E...", "....", "...X"]).unwrap();
        let mut tracer = RayTracer::new();
        let first = tracer.find_reached_tiles(&map, GridPoint::new(1, 1));
        let second = tracer.find_reached_tiles(&map, GridPoint::new(1, 1));
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);

        let moved = tracer.find_reached_tiles(&map, GridPoint::new(2, 1));
        assert!(!Rc::ptr_eq(&first, &moved));
    }

    #[test]
    fn start_off_the_map_sees_nothing() {
        let map = TileMap::from_plan(&["E.X"]).unwrap();
        let mut tracer = RayTracer::new();
        assert!(tracer.find_reached_tiles(&map, GridPoint::new(-4, 0)).is_empty());
        assert!(tracer.find_reached_tiles(&TileMap::default(), GridPoint::new(0, 0)).is_empty());
    }
}
