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

use log::{debug, error, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use std::rc::Rc;

use crate::actor::ActorRef;
use crate::creature::Creature;
use crate::error::MapError;
use crate::maps::route_finder::Routes;
use crate::point_f::PointF;
use crate::position::{self, GridPoint, GridRect};
use crate::tile::{PlanCell, Tile, TileClick, TileRole};

/// Dense grid of tiles indexed `[x][y]`. `None` cells are void: impassable and
/// never visible.
#[derive(Clone, Debug, Default)]
pub struct TileMap {
    tiles: Vec<Vec<Option<Tile>>>,
    columns: i32,
    rows: i32,
    entrance: GridPoint,
    exit: GridPoint,
    random_ground: Vec<GridPoint>,
    movement_routes: Routes,
    combat_actors: Vec<ActorRef>,
}

impl TileMap {
    /// Builds a map from plan rows (see [`PlanCell::from_symbol`]). Ragged rows
    /// are padded with void cells.
    pub fn from_plan<S: AsRef<str>>(plan: &[S]) -> Result<Self, MapError> {
        let rows = plan.len();
        let columns = plan
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        if rows == 0 || columns == 0 {
            return Err(MapError::EmptyPlan);
        }

        let mut tiles: Vec<Vec<Option<Tile>>> = vec![vec![None; rows]; columns];
        let mut entrance: Option<GridPoint> = None;
        let mut exit: Option<GridPoint> = None;
        let mut first_ground: Option<GridPoint> = None;

        for (y, row) in plan.iter().enumerate() {
            for (x, symbol) in row.as_ref().chars().enumerate() {
                let at = GridPoint::new(x as i32, y as i32);
                let role = match PlanCell::from_symbol(symbol) {
                    Some(PlanCell::Tile(role)) => role,
                    Some(PlanCell::Void) => continue,
                    None => return Err(MapError::UnknownSymbol { symbol, at }),
                };

                let role = match role {
                    TileRole::Entrance => match entrance {
                        Some(first) => {
                            error!("Duplicate entrance at {at}, keeping the one at {first}.");
                            TileRole::Ground
                        }
                        None => {
                            entrance = Some(at);
                            role
                        }
                    },
                    TileRole::Exit => match exit {
                        Some(first) => {
                            error!("Duplicate exit at {at}, keeping the one at {first}.");
                            TileRole::Ground
                        }
                        None => {
                            exit = Some(at);
                            role
                        }
                    },
                    _ => role,
                };

                if role == TileRole::Ground && first_ground.is_none() {
                    first_ground = Some(at);
                }
                tiles[x][y] = Some(Tile::new(at, role));
            }
        }

        let exit = exit.ok_or(MapError::MissingExit)?;
        let entrance = match entrance {
            Some(entrance) => entrance,
            None => {
                let fallback = first_ground.ok_or(MapError::MissingEntrance)?;
                warn!("Map has no entrance, entering on ground tile {fallback}.");
                fallback
            }
        };

        let random_ground = tiles
            .iter()
            .flatten()
            .flatten()
            .filter(|tile| tile.role() == TileRole::Ground && tile.grid_point() != entrance)
            .map(|tile| tile.grid_point())
            .collect();

        Ok(Self {
            tiles,
            columns: columns as i32,
            rows: rows as i32,
            entrance,
            exit,
            random_ground,
            movement_routes: Routes::new(),
            combat_actors: Vec::new(),
        })
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// The whole map as a grid rectangle.
    pub fn bounds(&self) -> GridRect {
        GridRect::new(
            GridPoint::new(0, 0),
            GridPoint::new(self.columns - 1, self.rows - 1),
        )
    }

    pub fn in_bounds(&self, grid_point: GridPoint) -> bool {
        grid_point.x >= 0 && grid_point.y >= 0 && grid_point.x < self.columns && grid_point.y < self.rows
    }

    /// Where the hero arrives: the entrance, or a ground tile standing in for it.
    pub fn entry_point(&self) -> GridPoint {
        self.entrance
    }

    pub fn exit(&self) -> GridPoint {
        self.exit
    }

    pub fn world_point_to_grid(&self, point: PointF) -> GridPoint {
        position::world_point_to_grid(point)
    }

    pub fn grid_point_to_world_point(&self, grid_point: GridPoint) -> PointF {
        position::grid_point_to_world_point(grid_point)
    }

    pub fn get_tile(&self, grid_point: GridPoint) -> Option<&Tile> {
        if !self.in_bounds(grid_point) {
            return None;
        }
        self.tiles[grid_point.x as usize][grid_point.y as usize].as_ref()
    }

    pub fn get_tile_mut(&mut self, grid_point: GridPoint) -> Option<&mut Tile> {
        if !self.in_bounds(grid_point) {
            return None;
        }
        self.tiles[grid_point.x as usize][grid_point.y as usize].as_mut()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten().flatten()
    }

    fn admits_actor(tile: &Tile, actor: &dyn Creature) -> bool {
        if tile.is_obstacle() {
            return false;
        }
        !(tile.role().is_entrance_or_exit() && !actor.is_hero())
    }

    /// Can `actor` cross this tile on its way somewhere else?
    pub fn is_grid_point_passable_by_actor(&self, grid_point: GridPoint, actor: &dyn Creature) -> bool {
        let Some(tile) = self.get_tile(grid_point) else {
            return false;
        };
        if !Self::admits_actor(tile, actor) {
            return false;
        }
        tile.occupants().iter().all(|occupant| {
            let occupant = occupant.borrow();
            occupant.id == actor.id() || occupant.is_passable_by_actor(actor)
        })
    }

    /// Can `actor` end its move here?
    pub fn can_grid_point_be_occupied_by_actor(&self, grid_point: GridPoint, actor: &dyn Creature) -> bool {
        let Some(tile) = self.get_tile(grid_point) else {
            return false;
        };
        if !Self::admits_actor(tile, actor) {
            return false;
        }
        tile.occupants().iter().all(|occupant| {
            let occupant = occupant.borrow();
            occupant.id == actor.id() || occupant.can_share_location_with_actor(actor)
        })
    }

    pub fn is_see_through(&self, grid_point: GridPoint) -> bool {
        match self.get_tile(grid_point) {
            Some(tile) => !tile.is_obstacle() && !tile.role().is_entrance_or_exit(),
            None => false,
        }
    }

    pub fn add_occupant(&mut self, occupant: &ActorRef, grid_point: GridPoint) -> bool {
        match self.get_tile_mut(grid_point) {
            Some(tile) => {
                tile.add_occupant(occupant);
                true
            }
            None => false,
        }
    }

    pub fn delete_occupant(&mut self, occupant: &ActorRef, grid_point: GridPoint) -> bool {
        match self.get_tile_mut(grid_point) {
            Some(tile) => tile.delete_occupant(occupant),
            None => false,
        }
    }

    /// Moves `occupant` from the tile at `old` to the tile at `new`.
    ///
    /// Passing the same reference twice is a no-op; two distinct but equal
    /// points still re-register the occupant.
    pub fn move_tile_occupancy_grid_point(&mut self, occupant: &ActorRef, old: &GridPoint, new: &GridPoint) {
        if std::ptr::eq(old, new) {
            return;
        }
        self.delete_occupant(occupant, *old);
        if !self.add_occupant(occupant, *new) {
            warn!("{} moved off the map to {new}.", occupant.borrow().name);
        }
    }

    /// Everyone standing on the four tiles orthogonally adjacent to `actor`.
    pub fn get_participants(&self, actor: &dyn Creature) -> Vec<ActorRef> {
        actor
            .grid_point()
            .cardinal_neighbours()
            .iter()
            .filter_map(|point| self.get_tile(*point))
            .flat_map(|tile| tile.occupants().iter().cloned())
            .filter(|occupant| occupant.borrow().id != actor.id())
            .collect()
    }

    /// A random ground tile nobody stands on, `None` if every one is taken.
    pub fn get_random_free_ground_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&Tile> {
        self.random_ground.shuffle(rng);
        let free = self
            .random_ground
            .iter()
            .copied()
            .find(|point| self.get_tile(*point).is_some_and(|tile| !tile.is_occupied()))?;
        self.get_tile(free)
    }

    pub fn set_movement_routes(&mut self, routes: Routes) {
        self.movement_routes = routes;
    }

    pub fn movement_routes(&self) -> &Routes {
        &self.movement_routes
    }

    pub fn set_combat_actors(&mut self, actors: Vec<ActorRef>) {
        self.combat_actors = actors;
    }

    pub fn combat_actors(&self) -> &[ActorRef] {
        &self.combat_actors
    }

    pub fn is_combat_tile(&self, grid_point: GridPoint) -> bool {
        self.get_tile(grid_point).is_some_and(|tile| {
            tile.occupants()
                .iter()
                .any(|occupant| self.combat_actors.iter().any(|actor| Rc::ptr_eq(occupant, actor)))
        })
    }

    pub fn clear_highlights(&mut self) {
        self.movement_routes.clear();
        self.combat_actors.clear();
    }

    /// Resolves a click against this turn's highlights. Clicks elsewhere are
    /// ignored.
    pub fn click(&self, grid_point: GridPoint) -> Option<TileClick> {
        let Some(tile) = self.get_tile(grid_point) else {
            debug!("Ignoring click on {grid_point}, there is no tile there.");
            return None;
        };
        let click = tile.click(self.movement_routes.get(&grid_point), &self.combat_actors);
        if click.is_none() {
            debug!("Ignoring click on {grid_point}, it is not highlighted.");
        }
        click
    }

    /// Grid cells under a world-space viewport, clamped to the map.
    pub fn visible_region(&self, top_left: PointF, size: PointF) -> Option<GridRect> {
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }
        let min = self.world_point_to_grid(top_left);
        let max = self.world_point_to_grid(PointF::new(top_left.x + size.x, top_left.y + size.y));
        let region = GridRect::new(
            GridPoint::new(min.x.max(0), min.y.max(0)),
            GridPoint::new(max.x.min(self.columns - 1), max.y.min(self.rows - 1)),
        );
        if region.is_empty() { None } else { Some(region) }
    }

    pub fn tiles_in_region(&self, region: GridRect) -> impl Iterator<Item = &Tile> {
        (region.min.x..=region.max.x)
            .flat_map(move |x| (region.min.y..=region.max.y).map(move |y| GridPoint::new(x, y)))
            .filter_map(|point| self.get_tile(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, ActorKind, ActorTemplate};
    use crate::position::grid_point_to_world_point;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn spawn(map: &mut TileMap, kind: ActorKind, at: GridPoint) -> ActorRef {
        let actor = Actor::new(&ActorTemplate::new("test", kind).with_hp(3), grid_point_to_world_point(at)).into_ref();
        map.add_occupant(&actor, at);
        actor
    }

    fn room() -> TileMap {
        TileMap::from_plan(&["...", "E.X", "..."]).unwrap()
    }

    #[test]
    fn missing_exit_aborts_construction() {
        assert_eq!(TileMap::from_plan(&["E..", "..."]).unwrap_err(), MapError::MissingExit);
        assert_eq!(TileMap::from_plan::<&str>(&[]).unwrap_err(), MapError::EmptyPlan);
        assert!(matches!(
            TileMap::from_plan(&["E.?X"]).unwrap_err(),
            MapError::UnknownSymbol { symbol: '?', .. }
        ));
    }

    #[test]
    fn first_entrance_and_exit_win() {
        let map = TileMap::from_plan(&["E.XE", ".X.."]).unwrap();
        assert_eq!(map.entry_point(), GridPoint::new(0, 0));
        assert_eq!(map.exit(), GridPoint::new(2, 0));
        assert_eq!(map.get_tile(GridPoint::new(3, 0)).unwrap().role(), TileRole::Ground);
        assert_eq!(map.get_tile(GridPoint::new(1, 1)).unwrap().role(), TileRole::Ground);
    }

    #[test]
    fn missing_entrance_falls_back_to_ground() {
        let map = TileMap::from_plan(&["#.X"]).unwrap();
        assert_eq!(map.entry_point(), GridPoint::new(1, 0));
        assert_eq!(TileMap::from_plan(&["#X"]).unwrap_err(), MapError::MissingEntrance);
    }

    #[test]
    fn void_and_out_of_bounds_are_impassable() {
        let mut map = TileMap::from_plan(&["E. X", "..."]).unwrap();
        let hero = spawn(&mut map, ActorKind::Hero, GridPoint::new(0, 0));
        let hero = hero.borrow();
        assert!(map.get_tile(GridPoint::new(2, 0)).is_none());
        assert!(map.get_tile(GridPoint::new(3, 1)).is_none());
        assert!(!map.is_grid_point_passable_by_actor(GridPoint::new(2, 0), &*hero));
        assert!(!map.is_grid_point_passable_by_actor(GridPoint::new(-1, 0), &*hero));
        assert!(!map.can_grid_point_be_occupied_by_actor(GridPoint::new(9, 9), &*hero));
        assert!(!map.is_see_through(GridPoint::new(2, 0)));
    }

    #[test]
    fn entrance_and_exit_only_admit_the_hero() {
        let mut map = room();
        let hero = spawn(&mut map, ActorKind::Hero, GridPoint::new(1, 0));
        let goblin = spawn(&mut map, ActorKind::Hostile, GridPoint::new(1, 2));
        let exit = map.exit();
        assert!(map.is_grid_point_passable_by_actor(exit, &*hero.borrow()));
        assert!(map.can_grid_point_be_occupied_by_actor(exit, &*hero.borrow()));
        assert!(!map.is_grid_point_passable_by_actor(exit, &*goblin.borrow()));
        assert!(!map.is_see_through(exit));
        assert!(!map.is_see_through(map.entry_point()));
        assert!(map.is_see_through(GridPoint::new(1, 1)));
    }

    #[test]
    fn occupied_tile_can_be_passable_but_not_occupiable() {
        let mut map = room();
        let first = spawn(&mut map, ActorKind::Hostile, GridPoint::new(1, 1));
        let second = spawn(&mut map, ActorKind::Hostile, GridPoint::new(1, 2));
        let second = second.borrow();
        assert!(first.borrow().is_passable_by_actor(&*second));
        assert!(!first.borrow().can_share_location_with_actor(&*second));
        assert!(map.is_grid_point_passable_by_actor(GridPoint::new(1, 1), &*second));
        assert!(!map.can_grid_point_be_occupied_by_actor(GridPoint::new(1, 1), &*second));
    }

    #[test]
    fn an_actor_never_blocks_itself() {
        let mut map = room();
        let goblin = spawn(&mut map, ActorKind::Hostile, GridPoint::new(1, 1));
        assert!(map.can_grid_point_be_occupied_by_actor(GridPoint::new(1, 1), &*goblin.borrow()));
    }

    #[test]
    fn participants_are_orthogonal_only() {
        let mut map = TileMap::from_plan(&["...", "E.X", "..."]).unwrap();
        let hero = spawn(&mut map, ActorKind::Hero, GridPoint::new(1, 1));
        let goblin = spawn(&mut map, ActorKind::Hostile, GridPoint::new(1, 0));

        let participants = map.get_participants(&*hero.borrow());
        assert_eq!(participants.len(), 1);
        assert!(Rc::ptr_eq(&participants[0], &goblin));

        let old = GridPoint::new(1, 0);
        let new = GridPoint::new(0, 0);
        goblin.borrow_mut().position = grid_point_to_world_point(new);
        map.move_tile_occupancy_grid_point(&goblin, &old, &new);
        assert!(map.get_participants(&*hero.borrow()).is_empty());
    }

    #[test]
    fn occupancy_move_with_same_reference_is_a_no_op() {
        let mut map = room();
        let goblin = spawn(&mut map, ActorKind::Hostile, GridPoint::new(1, 1));
        let point = GridPoint::new(1, 1);
        map.move_tile_occupancy_grid_point(&goblin, &point, &point);
        assert!(map.get_tile(point).unwrap().has_occupant(&goblin));

        let copy = point;
        map.move_tile_occupancy_grid_point(&goblin, &point, &copy);
        assert_eq!(map.get_tile(point).unwrap().occupants().len(), 1);
    }

    #[test]
    fn random_free_ground_skips_occupied_and_entry() {
        let mut map = TileMap::from_plan(&["E..X"]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        spawn(&mut map, ActorKind::Prop, GridPoint::new(1, 0));
        for _ in 0..10 {
            let tile = map.get_random_free_ground_tile(&mut rng).unwrap();
            assert_eq!(tile.grid_point(), GridPoint::new(2, 0));
        }
        spawn(&mut map, ActorKind::Prop, GridPoint::new(2, 0));
        assert!(map.get_random_free_ground_tile(&mut rng).is_none());
    }

    #[test]
    fn clicks_are_filtered_by_highlights() {
        let mut map = room();
        let goblin = spawn(&mut map, ActorKind::Hostile, GridPoint::new(2, 2));
        assert!(map.click(GridPoint::new(1, 1)).is_none());

        let mut routes = Routes::new();
        routes.insert(GridPoint::new(1, 1), vec![GridPoint::new(1, 1)]);
        map.set_movement_routes(routes);
        map.set_combat_actors(vec![Rc::clone(&goblin)]);

        let click = map.click(GridPoint::new(1, 1)).unwrap();
        assert_eq!(click.route, Some(vec![GridPoint::new(1, 1)]));
        assert!(!click.combat);
        assert!(map.click(GridPoint::new(2, 2)).unwrap().combat);
        assert!(map.is_combat_tile(GridPoint::new(2, 2)));

        map.clear_highlights();
        assert!(map.click(GridPoint::new(1, 1)).is_none());
    }

    #[test]
    fn visible_region_is_clamped() {
        let map = room();
        let region = map
            .visible_region(PointF::new(-40.0, 40.0), PointF::new(64.0, 500.0))
            .unwrap();
        assert_eq!(region.min, GridPoint::new(0, 1));
        assert_eq!(region.max, GridPoint::new(0, 2));
        assert_eq!(map.tiles_in_region(region).count(), 2);
        assert!(map.visible_region(PointF::new(500.0, 0.0), PointF::new(10.0, 10.0)).is_none());
    }
}
