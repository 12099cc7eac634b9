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
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::creature::Creature;
use crate::point_f::PointF;

pub type ActorId = u32;

/// Shared handle to an actor; tiles hold these and compare them by identity.
pub type ActorRef = Rc<RefCell<Actor>>;

static ACTOR_ID_COUNTER: AtomicU32 = AtomicU32::new(1);

fn next_actor_id() -> ActorId {
    ACTOR_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Hero,
    Hostile,
    Trader,
    Prop,
    HiddenArtefact,
}

/// Static description of an actor, as found in campaign files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorTemplate {
    pub name: String,
    pub kind: ActorKind,
    #[serde(default = "default_max_hp")]
    pub max_hp: u32,
    #[serde(default = "default_attack")]
    pub attack: u32,
    #[serde(default)]
    pub defence: u32,
    #[serde(default)]
    pub speed: u32,
    #[serde(default)]
    pub max_tiles_per_move: u32,
}

fn default_max_hp() -> u32 {
    1
}

fn default_attack() -> u32 {
    1
}

impl ActorTemplate {
    pub fn new(name: &str, kind: ActorKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            max_hp: default_max_hp(),
            attack: default_attack(),
            defence: 0,
            speed: 0,
            max_tiles_per_move: 0,
        }
    }

    pub fn with_hp(mut self, max_hp: u32) -> Self {
        self.max_hp = max_hp;
        self
    }

    pub fn with_moves(mut self, max_tiles_per_move: u32) -> Self {
        self.max_tiles_per_move = max_tiles_per_move;
        self
    }

    pub fn with_combat(mut self, attack: u32, defence: u32, speed: u32) -> Self {
        self.attack = attack;
        self.defence = defence;
        self.speed = speed;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(skip, default = "next_actor_id")]
    pub id: ActorId,
    pub name: String,
    pub kind: ActorKind,
    pub position: PointF,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defence: u32,
    pub speed: u32,
    pub max_tiles_per_move: u32,
}

impl Actor {
    pub fn new(template: &ActorTemplate, position: PointF) -> Self {
        Self {
            id: next_actor_id(),
            name: template.name.clone(),
            kind: template.kind,
            position,
            hp: template.max_hp,
            max_hp: template.max_hp,
            attack: template.attack,
            defence: template.defence,
            speed: template.speed,
            max_tiles_per_move: template.max_tiles_per_move,
        }
    }

    pub fn into_ref(self) -> ActorRef {
        Rc::new(RefCell::new(self))
    }

    pub fn add_health(&mut self, amount: i32) {
        let hp = (self.hp as i64 + amount as i64).clamp(0, self.max_hp as i64);
        self.hp = hp as u32;
    }

    pub fn take_damage(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Rebuilds an actor from [`Actor::to_json`] output. The revived actor gets
    /// a fresh id; it is a new identity on the grid.
    pub fn revive(json: &str) -> serde_json::Result<Actor> {
        serde_json::from_str(json)
    }
}

impl Creature for Actor {
    fn id(&self) -> ActorId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ActorKind {
        self.kind
    }

    fn position(&self) -> PointF {
        self.position
    }

    fn set_position(&mut self, position: PointF) {
        self.position = position;
    }

    fn max_tiles_per_move(&self) -> u32 {
        self.max_tiles_per_move
    }

    fn is_alive(&self) -> bool {
        self.hp > 0
    }

    fn is_passable_by_actor(&self, actor: &dyn Creature) -> bool {
        if !self.is_alive() {
            return true;
        }
        match self.kind {
            ActorKind::Hero => false,
            ActorKind::Hostile => actor.kind() == ActorKind::Hostile,
            ActorKind::Trader => actor.is_hero(),
            ActorKind::Prop => false,
            ActorKind::HiddenArtefact => true,
        }
    }

    fn can_share_location_with_actor(&self, actor: &dyn Creature) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.kind {
            ActorKind::Hero | ActorKind::Hostile | ActorKind::Prop => false,
            ActorKind::Trader => actor.is_hero(),
            ActorKind::HiddenArtefact => true,
        }
    }
}
