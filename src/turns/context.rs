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

use futures::future::{LocalBoxFuture, join_all};
use log::{debug, info};
use rand::rngs::StdRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::actor::{Actor, ActorRef};
use crate::campaign::Campaign;
use crate::config::TurnConfig;
use crate::creature::Creature;
use crate::error::TurnError;
use crate::maps::route_finder::RouteFinder;
use crate::maps::world::WorldRef;
use crate::point_f::PointF;
use crate::position::{GridPoint, grid_point_to_world_point};

/// Resolves fights. Attacks are asynchronous so a front end can animate them.
pub trait Fighting {
    fn resolve_attacker_defender<'a>(
        &'a self,
        attacker: &'a ActorRef,
        defender: &'a ActorRef,
    ) -> LocalBoxFuture<'a, ()>;

    fn try_to_run_from_opponent(&self, actor: &Actor, opponent: &Actor) -> bool;
}

/// What the turn engine needs from whoever puts the game on screen.
pub trait Stage {
    /// Shows `message` and resolves once the player presses the button.
    fn show_ok_dialog<'a>(&'a self, message: &'a str, button_label: &'a str) -> LocalBoxFuture<'a, ()>;

    fn alert(&self, message: &str);

    /// Animates `actor` through `waypoints`. The actor's position is updated
    /// by the caller once the glide resolves.
    fn glide<'a>(&'a self, actor: &'a ActorRef, waypoints: &'a [PointF]) -> LocalBoxFuture<'a, ()>;
}

pub(crate) const WELCOME_MESSAGE: &str = "Find the exit of every level to escape the dungeon.";
pub(crate) const GAME_OVER_MESSAGE: &str = "You have been slain.";
pub(crate) const GAME_COMPLETED_MESSAGE: &str = "You found your way out of the dungeon!";
pub(crate) const ENTRANCE_MESSAGE: &str = "Going back up is not possible yet.";

/// Everything the turn states act on. Borrows of the world are kept short
/// and never held across an await.
pub struct TurnContext<F: Fighting, S: Stage> {
    pub world: WorldRef,
    pub fighting: F,
    pub stage: S,
    campaign: Campaign,
    rng: RefCell<StdRng>,
    hero: RefCell<Option<ActorRef>>,
    hero_snapshot: RefCell<Option<String>>,
    scene_index: Cell<usize>,
}

impl<F: Fighting, S: Stage> TurnContext<F, S> {
    pub fn new(world: WorldRef, fighting: F, stage: S, campaign: Campaign) -> Self {
        let rng = RefCell::new(campaign.config.rng());
        Self {
            world,
            fighting,
            stage,
            campaign,
            rng,
            hero: RefCell::new(None),
            hero_snapshot: RefCell::new(None),
            scene_index: Cell::new(0),
        }
    }

    pub fn config(&self) -> &TurnConfig {
        &self.campaign.config
    }

    pub fn scene_index(&self) -> usize {
        self.scene_index.get()
    }

    pub fn hero(&self) -> Result<ActorRef, TurnError> {
        self.hero.borrow().clone().ok_or(TurnError::NoHero)
    }

    pub(crate) fn hero_is_alive(&self) -> Result<bool, TurnError> {
        Ok(self.hero()?.borrow().is_alive())
    }

    /// Creates the hero on the first game and restores the starting one on
    /// every game after that.
    fn spawn_hero(&self) -> Result<ActorRef, TurnError> {
        let snapshot = self.hero_snapshot.borrow().clone();
        let hero = match snapshot {
            Some(json) => Actor::revive(&json).map_err(TurnError::Revive)?,
            None => {
                let hero = Actor::new(&self.campaign.hero, PointF::zero());
                *self.hero_snapshot.borrow_mut() = Some(hero.to_json().map_err(TurnError::Revive)?);
                hero
            }
        }
        .into_ref();
        *self.hero.borrow_mut() = Some(Rc::clone(&hero));
        Ok(hero)
    }

    pub(crate) async fn new_game(&self) -> Result<(), TurnError> {
        self.spawn_hero()?;
        info!("Starting a new game as {}.", self.hero()?.borrow().name);
        self.start_scene(0).await
    }

    pub(crate) async fn start_scene(&self, index: usize) -> Result<(), TurnError> {
        let scene = self.campaign.scene(index)?;
        let hero = self.hero()?;
        self.world
            .borrow_mut()
            .load_scene(scene, &hero, &mut *self.rng.borrow_mut())?;
        self.scene_index.set(index);

        if let Some(intro) = &scene.intro {
            self.stage.show_ok_dialog(intro, "Continue").await;
        }
        Ok(())
    }

    pub(crate) fn has_next_scene(&self) -> bool {
        self.scene_index.get() + 1 < self.campaign.scene_count()
    }

    /// Publishes the hero's reachable tiles and foes to the tile map and
    /// recasts the hero's rays. Returns how many foes are adjacent.
    pub(crate) fn publish_hero_highlights(&self) -> Result<usize, TurnError> {
        let hero = self.hero()?;
        let hero = hero.borrow();
        let start = hero.grid_point();
        let mut world = self.world.borrow_mut();

        world.find_reached_tiles(start);
        let routes = RouteFinder::new(world.get_tile_map(), &*hero).get_all_routes_from(start, hero.max_tiles_per_move());
        let participants = world.combat_participants(&*hero);
        let count = participants.len();
        debug!("{} can reach {} tiles and fight {count} foes.", hero.name, routes.len());

        let tile_map = world.get_tile_map_mut();
        tile_map.set_movement_routes(routes);
        tile_map.set_combat_actors(participants);
        Ok(count)
    }

    pub(crate) fn hero_participants(&self) -> Result<Vec<ActorRef>, TurnError> {
        let hero = self.hero()?;
        let participants = self.world.borrow().combat_participants(&*hero.borrow());
        Ok(participants)
    }

    /// Glides `actor` through `waypoints` and settles it on the last one.
    pub(crate) async fn move_actor_along(&self, actor: &ActorRef, waypoints: Vec<PointF>) {
        let Some(destination) = waypoints.last().copied() else {
            return;
        };
        if actor.borrow().is_hero() {
            self.world.borrow_mut().get_tile_map_mut().clear_highlights();
        }
        self.stage.glide(actor, &waypoints).await;
        self.world.borrow_mut().move_actor(actor, destination);
    }

    pub(crate) async fn move_hero_along(&self, route: &[GridPoint]) -> Result<(), TurnError> {
        let hero = self.hero()?;
        let waypoints = route.iter().map(|point| grid_point_to_world_point(*point)).collect();
        self.move_actor_along(&hero, waypoints).await;
        Ok(())
    }

    /// Every adjacent foe must let the hero go for the hero to leave.
    pub(crate) fn hero_escapes(&self) -> Result<bool, TurnError> {
        let hero = self.hero()?;
        for opponent in self.hero_participants()? {
            if !self.fighting.try_to_run_from_opponent(&hero.borrow(), &opponent.borrow()) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The hero strikes every foe standing on `target` at once.
    pub(crate) async fn hero_attacks(&self, target: GridPoint) -> Result<(), TurnError> {
        let hero = self.hero()?;
        let defenders: Vec<ActorRef> = {
            let world = self.world.borrow();
            let tile_map = world.get_tile_map();
            match tile_map.get_tile(target) {
                Some(tile) => tile
                    .occupants()
                    .iter()
                    .filter(|occupant| tile_map.combat_actors().iter().any(|foe| Rc::ptr_eq(foe, *occupant)))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            }
        };
        self.world.borrow_mut().get_tile_map_mut().clear_highlights();

        join_all(
            defenders
                .iter()
                .map(|defender| self.fighting.resolve_attacker_defender(&hero, defender)),
        )
        .await;
        self.world.borrow_mut().remove_dead_actors();
        Ok(())
    }

    /// Where a computer actor goes this turn, or nothing if it stays put.
    fn plan_pursuit(&self, actor: &ActorRef, hero: &ActorRef) -> Vec<PointF> {
        let world = self.world.borrow();
        let actor = actor.borrow();
        let hero = hero.borrow();
        if !actor.is_hostile_to(&*hero) {
            return Vec::new();
        }

        let from = actor.grid_point();
        let to = hero.grid_point();
        let reach = actor.max_tiles_per_move() * self.config().too_many_turns_to_reach;
        if from.manhattan_distance(&to) > reach {
            info!("{} at {from} is too far from {to} to bother.", actor.name);
            return Vec::new();
        }
        if !world.is_visible(from) {
            debug!("{} at {from} is out of sight.", actor.name);
            return Vec::new();
        }

        RouteFinder::new(world.get_tile_map(), &*actor).get_dumb_route_next_to(
            from,
            to,
            actor.max_tiles_per_move(),
            &mut *self.rng.borrow_mut(),
        )
    }

    /// One computer turn. Each actor in turn either strikes the hero, when
    /// `fighting` and next to it, or closes in. Stops early once the hero falls.
    pub(crate) async fn run_computer_turn(&self, fighting: bool) -> Result<(), TurnError> {
        let hero = self.hero()?;
        let actors: Vec<ActorRef> = {
            let mut world = self.world.borrow_mut();
            let start = hero.borrow().grid_point();
            world.find_reached_tiles(start);
            world
                .get_actors()
                .iter()
                .filter(|actor| !Rc::ptr_eq(*actor, &hero))
                .cloned()
                .collect()
        };

        for actor in &actors {
            if !hero.borrow().is_alive() {
                break;
            }
            if !actor.borrow().is_alive() {
                continue;
            }

            let adjacent = fighting
                && self
                    .hero_participants()?
                    .iter()
                    .any(|participant| Rc::ptr_eq(participant, actor));
            if adjacent {
                self.fighting.resolve_attacker_defender(actor, &hero).await;
                continue;
            }

            let waypoints = self.plan_pursuit(actor, &hero);
            if !waypoints.is_empty() {
                self.move_actor_along(actor, waypoints).await;
            }
        }

        self.world.borrow_mut().remove_dead_actors();
        Ok(())
    }
}
