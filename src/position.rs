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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

use crate::point_f::PointF;

/// Edge length of a grid cell in world (pixel) units.
pub const GRID_SIZE: f32 = 32.0;

/// The four grid directions, in the order every search in the crate tries them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Up, right, down, left.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

/// Integer (column, row) address of a tile.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        self.offset(dx, dy)
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Orthogonal (Manhattan) distance.
    pub fn manhattan_distance(&self, other: &GridPoint) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four orthogonal neighbours, up, right, down, left.
    pub fn cardinal_neighbours(&self) -> [GridPoint; 4] {
        Direction::CARDINALS.map(|direction| self.step(direction))
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive rectangle of grid points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GridRect {
    pub min: GridPoint,
    pub max: GridPoint,
}

impl GridRect {
    pub fn new(min: GridPoint, max: GridPoint) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: &GridPoint) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Every cell on the rectangle's edge, each listed once, clockwise from the
    /// top-left corner.
    pub fn perimeter(&self) -> Vec<GridPoint> {
        if self.is_empty() {
            return Vec::new();
        }
        let GridRect { min, max } = *self;
        if min.x == max.x || min.y == max.y {
            let mut cells = Vec::new();
            for x in min.x..=max.x {
                for y in min.y..=max.y {
                    cells.push(GridPoint::new(x, y));
                }
            }
            return cells;
        }

        let mut cells = Vec::new();
        for x in min.x..max.x {
            cells.push(GridPoint::new(x, min.y));
        }
        for y in min.y..max.y {
            cells.push(GridPoint::new(max.x, y));
        }
        for x in (min.x + 1..=max.x).rev() {
            cells.push(GridPoint::new(x, max.y));
        }
        for y in (min.y + 1..=max.y).rev() {
            cells.push(GridPoint::new(min.x, y));
        }
        cells
    }
}

pub fn world_point_to_grid(point: PointF) -> GridPoint {
    GridPoint {
        x: (point.x / GRID_SIZE).floor() as i32,
        y: (point.y / GRID_SIZE).floor() as i32,
    }
}

/// Pixel centre of the tile at `grid_point`.
pub fn grid_point_to_world_point(grid_point: GridPoint) -> PointF {
    PointF::new(
        grid_point.x as f32 * GRID_SIZE + GRID_SIZE / 2.0,
        grid_point.y as f32 * GRID_SIZE + GRID_SIZE / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_round_trip() {
        for x in -3..12 {
            for y in -3..12 {
                let grid_point = GridPoint::new(x, y);
                assert_eq!(
                    world_point_to_grid(grid_point_to_world_point(grid_point)),
                    grid_point
                );
            }
        }
    }

    #[test]
    fn world_points_floor_into_cells() {
        assert_eq!(world_point_to_grid(PointF::new(0.0, 31.9)), GridPoint::new(0, 0));
        assert_eq!(world_point_to_grid(PointF::new(32.0, 64.0)), GridPoint::new(1, 2));
        assert_eq!(world_point_to_grid(PointF::new(-0.5, 5.0)), GridPoint::new(-1, 0));
    }

    #[test]
    fn perimeter_lists_each_edge_cell_once() {
        let rect = GridRect::new(GridPoint::new(0, 0), GridPoint::new(3, 2));
        let cells = rect.perimeter();
        assert_eq!(cells.len(), 10);
        let unique: std::collections::HashSet<_> = cells.iter().copied().collect();
        assert_eq!(unique.len(), cells.len());
        assert!(!unique.contains(&GridPoint::new(1, 1)));

        let column = GridRect::new(GridPoint::new(2, 0), GridPoint::new(2, 3));
        assert_eq!(column.perimeter().len(), 4);
    }
}
