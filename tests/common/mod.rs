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

#![allow(dead_code)]

use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::block_on;
use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};

use dungeon_tactics::actor::{Actor, ActorId};
use dungeon_tactics::{
    ActorRef, ActorSpawn, ActorTemplate, Campaign, Fighting, PointF, SceneDefinition, Stage, TurnConfig, TurnEvent,
    TurnManager, World,
};

/// Records what the engine asked for and resolves at once, unless a glide
/// has been gated.
#[derive(Default)]
pub struct TestStage {
    pub dialogs: RefCell<Vec<String>>,
    pub alerts: RefCell<Vec<String>>,
    pub glides: RefCell<Vec<(ActorId, Vec<PointF>)>>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl TestStage {
    /// Holds the next glide until the returned sender fires.
    pub fn gate_next_glide(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        *self.gate.borrow_mut() = Some(receiver);
        sender
    }
}

impl Stage for TestStage {
    fn show_ok_dialog<'a>(&'a self, message: &'a str, _button_label: &'a str) -> LocalBoxFuture<'a, ()> {
        self.dialogs.borrow_mut().push(message.to_string());
        async {}.boxed_local()
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn glide<'a>(&'a self, actor: &'a ActorRef, waypoints: &'a [PointF]) -> LocalBoxFuture<'a, ()> {
        self.glides.borrow_mut().push((actor.borrow().id, waypoints.to_vec()));
        let gate = self.gate.borrow_mut().take();
        async move {
            if let Some(receiver) = gate {
                receiver.await.ok();
            }
        }
        .boxed_local()
    }
}

/// Every hit deals `damage`; fleeing succeeds when `flee` says so.
pub struct ScriptedFighting {
    pub damage: u32,
    pub flee: Cell<bool>,
    pub flee_attempts: Cell<u32>,
    pub attacks: RefCell<Vec<(ActorId, ActorId)>>,
}

impl ScriptedFighting {
    pub fn new(damage: u32) -> Self {
        Self {
            damage,
            flee: Cell::new(true),
            flee_attempts: Cell::new(0),
            attacks: RefCell::new(Vec::new()),
        }
    }
}

impl Fighting for ScriptedFighting {
    fn resolve_attacker_defender<'a>(
        &'a self,
        attacker: &'a ActorRef,
        defender: &'a ActorRef,
    ) -> LocalBoxFuture<'a, ()> {
        async move {
            let ids = (attacker.borrow().id, defender.borrow().id);
            self.attacks.borrow_mut().push(ids);
            defender.borrow_mut().take_damage(self.damage);
        }
        .boxed_local()
    }

    fn try_to_run_from_opponent(&self, _actor: &Actor, _opponent: &Actor) -> bool {
        self.flee_attempts.set(self.flee_attempts.get() + 1);
        self.flee.get()
    }
}

pub type TestManager = TurnManager<ScriptedFighting, TestStage>;

pub fn scene(name: &str, plan: &[&str], actors: Vec<ActorSpawn>) -> SceneDefinition {
    SceneDefinition {
        name: name.to_string(),
        intro: None,
        plan: plan.iter().map(|row| row.to_string()).collect(),
        actors,
    }
}

pub fn spawn(template: ActorTemplate, x: i32, y: i32) -> ActorSpawn {
    ActorSpawn {
        template,
        at: Some(dungeon_tactics::GridPoint::new(x, y)),
    }
}

pub fn campaign(hero: ActorTemplate, scenes: Vec<SceneDefinition>) -> Campaign {
    Campaign::new(hero, scenes).unwrap().with_config(TurnConfig {
        too_many_turns_to_reach: 2,
        seed: Some(7),
    })
}

pub fn manager(campaign: Campaign, damage: u32) -> TestManager {
    TurnManager::new(
        World::new().into_ref(),
        ScriptedFighting::new(damage),
        TestStage::default(),
        campaign,
    )
}

/// A manager that has already received the start event.
pub fn started(campaign: Campaign, damage: u32) -> TestManager {
    let manager = manager(campaign, damage);
    block_on(manager.trigger(TurnEvent::StartGame)).unwrap();
    manager
}

pub fn actor_named(manager: &TestManager, name: &str) -> Option<ActorRef> {
    manager
        .world()
        .borrow()
        .get_actors()
        .iter()
        .find(|actor| actor.borrow().name == name)
        .cloned()
}
