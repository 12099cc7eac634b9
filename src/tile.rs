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

use std::rc::Rc;

use crate::actor::ActorRef;
use crate::position::GridPoint;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TileRole {
    Obstacle,
    Ground,
    Entrance,
    Exit,
    StairsUp,
    StairsDown,
}

impl TileRole {
    pub fn is_entrance_or_exit(&self) -> bool {
        matches!(self, TileRole::Entrance | TileRole::Exit)
    }
}

/// One character of a map plan.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlanCell {
    /// Nothing is built here.
    Void,
    Tile(TileRole),
}

impl PlanCell {
    /// `None` for a symbol plans don't use.
    pub fn from_symbol(symbol: char) -> Option<PlanCell> {
        let role = match symbol {
            ' ' => return Some(PlanCell::Void),
            '#' => TileRole::Obstacle,
            '.' => TileRole::Ground,
            'E' => TileRole::Entrance,
            'X' => TileRole::Exit,
            '<' => TileRole::StairsUp,
            '>' => TileRole::StairsDown,
            _ => return None,
        };
        Some(PlanCell::Tile(role))
    }
}

/// What a click on a highlighted tile means to the turn manager.
#[derive(Clone, Debug, PartialEq)]
pub struct TileClick {
    pub grid_point: GridPoint,
    pub role: TileRole,
    /// Route the hero would take to get here, if the tile is a movement target.
    pub route: Option<Vec<GridPoint>>,
    /// The tile holds at least one of this turn's combatants.
    pub combat: bool,
}

#[derive(Clone, Debug)]
pub struct Tile {
    role: TileRole,
    obstacle: bool,
    grid_point: GridPoint,
    occupants: Vec<ActorRef>,
}

impl Tile {
    pub fn new(grid_point: GridPoint, role: TileRole) -> Self {
        Self {
            role,
            obstacle: role == TileRole::Obstacle,
            grid_point,
            occupants: Vec::new(),
        }
    }

    pub fn role(&self) -> TileRole {
        self.role
    }

    pub fn is_obstacle(&self) -> bool {
        self.obstacle
    }

    pub fn grid_point(&self) -> GridPoint {
        self.grid_point
    }

    pub fn occupants(&self) -> &[ActorRef] {
        &self.occupants
    }

    pub fn is_occupied(&self) -> bool {
        !self.occupants.is_empty()
    }

    pub fn has_occupant(&self, actor: &ActorRef) -> bool {
        self.occupants.iter().any(|occupant| Rc::ptr_eq(occupant, actor))
    }

    /// Adds `actor` unless this very actor is already here.
    pub fn add_occupant(&mut self, actor: &ActorRef) {
        if !self.has_occupant(actor) {
            self.occupants.push(Rc::clone(actor));
        }
    }

    pub fn delete_occupant(&mut self, actor: &ActorRef) -> bool {
        let before = self.occupants.len();
        self.occupants.retain(|occupant| !Rc::ptr_eq(occupant, actor));
        self.occupants.len() != before
    }

    /// Describes a click on this tile given the currently highlighted route and
    /// combatants; `None` when the tile is neither.
    pub fn click(&self, route: Option<&Vec<GridPoint>>, combat_actors: &[ActorRef]) -> Option<TileClick> {
        let combat = self
            .occupants
            .iter()
            .any(|occupant| combat_actors.iter().any(|actor| Rc::ptr_eq(occupant, actor)));
        if route.is_none() && !combat {
            return None;
        }
        Some(TileClick {
            grid_point: self.grid_point,
            role: self.role,
            route: route.cloned(),
            combat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, ActorKind, ActorTemplate};
    use crate::point_f::PointF;

    fn goblin() -> ActorRef {
        Actor::new(&ActorTemplate::new("goblin", ActorKind::Hostile), PointF::zero()).into_ref()
    }

    #[test]
    fn occupants_are_keyed_by_identity() {
        let mut tile = Tile::new(GridPoint::new(0, 0), TileRole::Ground);
        let first = goblin();
        let twin = Rc::new(std::cell::RefCell::new(first.borrow().clone()));

        tile.add_occupant(&first);
        tile.add_occupant(&first);
        assert_eq!(tile.occupants().len(), 1);

        tile.add_occupant(&twin);
        assert_eq!(tile.occupants().len(), 2);

        assert!(tile.delete_occupant(&first));
        assert!(!tile.has_occupant(&first));
        assert!(tile.has_occupant(&twin));
    }

    #[test]
    fn plan_symbols() {
        assert_eq!(PlanCell::from_symbol(' '), Some(PlanCell::Void));
        assert_eq!(PlanCell::from_symbol('#'), Some(PlanCell::Tile(TileRole::Obstacle)));
        assert_eq!(PlanCell::from_symbol('X'), Some(PlanCell::Tile(TileRole::Exit)));
        assert_eq!(PlanCell::from_symbol('>'), Some(PlanCell::Tile(TileRole::StairsDown)));
        assert_eq!(PlanCell::from_symbol('?'), None);
    }

    #[test]
    fn obstacle_flag_follows_role() {
        assert!(Tile::new(GridPoint::new(1, 1), TileRole::Obstacle).is_obstacle());
        assert!(!Tile::new(GridPoint::new(1, 1), TileRole::Exit).is_obstacle());
    }

    #[test]
    fn click_outside_highlights_is_none() {
        let mut tile = Tile::new(GridPoint::new(2, 2), TileRole::Ground);
        assert_eq!(tile.click(None, &[]), None);

        let enemy = goblin();
        tile.add_occupant(&enemy);
        let click = tile.click(None, &[Rc::clone(&enemy)]).unwrap();
        assert!(click.combat);
        assert_eq!(click.route, None);
    }
}
