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

use log::{debug, info, warn};
use rand::Rng;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::actor::{Actor, ActorKind, ActorRef};
use crate::campaign::SceneDefinition;
use crate::creature::Creature;
use crate::error::MapError;
use crate::maps::ray_tracer::RayTracer;
use crate::point_f::PointF;
use crate::position::{GridPoint, grid_point_to_world_point, world_point_to_grid};
use crate::tile_map::TileMap;

pub type WorldRef = Rc<RefCell<World>>;

/// The current scene: its tile map, everyone on it and what the hero can see.
///
/// Every actor in `actors` is registered as an occupant of exactly the tile
/// under its position. All movement goes through [`World::move_actor`] to
/// keep it that way.
#[derive(Debug, Default)]
pub struct World {
    scene_name: String,
    tile_map: TileMap,
    actors: Vec<ActorRef>,
    ray_tracer: RayTracer,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_ref(self) -> WorldRef {
        Rc::new(RefCell::new(self))
    }

    pub fn scene_name(&self) -> &str {
        &self.scene_name
    }

    pub fn get_tile_map(&self) -> &TileMap {
        &self.tile_map
    }

    pub fn get_tile_map_mut(&mut self) -> &mut TileMap {
        &mut self.tile_map
    }

    pub fn get_actors(&self) -> &[ActorRef] {
        &self.actors
    }

    pub fn hero(&self) -> Option<ActorRef> {
        self.actors.iter().find(|actor| actor.borrow().is_hero()).cloned()
    }

    pub fn clear_all(&mut self) {
        debug!("Clearing scene {:?}.", self.scene_name);
        self.scene_name.clear();
        self.tile_map = TileMap::default();
        self.actors.clear();
        self.ray_tracer.reset();
    }

    /// Replaces the current scene with `scene`, placing `hero` on its entry
    /// point and spawning the scene's actors in order.
    ///
    /// A plan that fails to build leaves the current scene untouched.
    pub fn load_scene<R: Rng + ?Sized>(
        &mut self,
        scene: &SceneDefinition,
        hero: &ActorRef,
        rng: &mut R,
    ) -> Result<(), MapError> {
        let tile_map = TileMap::from_plan(&scene.plan)?;

        self.clear_all();
        self.scene_name = scene.name.clone();
        self.tile_map = tile_map;

        let entry = self.tile_map.entry_point();
        hero.borrow_mut().set_position(grid_point_to_world_point(entry));
        self.add_actor(Rc::clone(hero));

        for spawn in &scene.actors {
            let at = match spawn.at {
                Some(at) => at,
                None => match self.tile_map.get_random_free_ground_tile(rng) {
                    Some(tile) => tile.grid_point(),
                    None => {
                        warn!("No free ground left for {} in {}.", spawn.template.name, scene.name);
                        continue;
                    }
                },
            };
            let actor = Actor::new(&spawn.template, grid_point_to_world_point(at));
            if !self.tile_map.can_grid_point_be_occupied_by_actor(at, &actor) {
                warn!("Skipping {}, {at} cannot hold it in {}.", spawn.template.name, scene.name);
                continue;
            }
            self.add_actor(actor.into_ref());
        }

        info!(
            "Loaded scene {} ({}x{}) with {} actors.",
            scene.name,
            self.tile_map.columns(),
            self.tile_map.rows(),
            self.actors.len()
        );
        Ok(())
    }

    /// Registers `actor` on the tile under its current position.
    pub fn add_actor(&mut self, actor: ActorRef) {
        let grid_point = actor.borrow().grid_point();
        if !self.tile_map.add_occupant(&actor, grid_point) {
            warn!("{} was added off the map at {grid_point}.", actor.borrow().name);
        }
        self.actors.push(actor);
    }

    /// Puts `actor` at `destination` and moves its tile registration along.
    pub fn move_actor(&mut self, actor: &ActorRef, destination: PointF) {
        let old = actor.borrow().grid_point();
        actor.borrow_mut().set_position(destination);
        let new = world_point_to_grid(destination);
        self.tile_map.move_tile_occupancy_grid_point(actor, &old, &new);
    }

    pub fn remove_actor(&mut self, actor: &ActorRef) {
        let grid_point = actor.borrow().grid_point();
        self.tile_map.delete_occupant(actor, grid_point);
        self.actors.retain(|other| !Rc::ptr_eq(other, actor));
    }

    /// Takes slain hostiles off the map. Dead props and traders stay where
    /// they fell.
    pub fn remove_dead_actors(&mut self) -> Vec<ActorRef> {
        let dead: Vec<ActorRef> = self
            .actors
            .iter()
            .filter(|actor| {
                let actor = actor.borrow();
                actor.kind == ActorKind::Hostile && !actor.is_alive()
            })
            .cloned()
            .collect();
        for actor in &dead {
            info!("{} is slain.", actor.borrow().name);
            self.remove_actor(actor);
        }
        dead
    }

    /// Neighbours of `actor` that it is at war with.
    pub fn combat_participants(&self, actor: &dyn Creature) -> Vec<ActorRef> {
        self.tile_map
            .get_participants(actor)
            .into_iter()
            .filter(|occupant| occupant.borrow().is_hostile_to(actor))
            .collect()
    }

    pub fn find_reached_tiles(&mut self, start: GridPoint) -> Rc<HashSet<GridPoint>> {
        self.ray_tracer.find_reached_tiles(&self.tile_map, start)
    }

    pub fn is_visible(&self, grid_point: GridPoint) -> bool {
        self.ray_tracer.is_grid_point_in_rays(grid_point)
    }
}
