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

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use log::{debug, info};
use rand::Rng;
use rand::rngs::StdRng;
use std::cell::RefCell;

use crate::actor::{Actor, ActorRef};
use crate::config::TurnConfig;
use crate::creature::Creature;
use crate::turns::Fighting;

/// Dice based melee: a hit rolls `1..=attack` and the defender's `defence`
/// soaks part of it.
pub struct MeleeCombat {
    rng: RefCell<StdRng>,
}

impl MeleeCombat {
    pub fn new(config: &TurnConfig) -> Self {
        Self { rng: RefCell::new(config.rng()) }
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self { rng: RefCell::new(rng) }
    }

    fn roll_damage(&self, attacker: &Actor, defender: &Actor) -> u32 {
        let roll = self.rng.borrow_mut().gen_range(1..=attacker.attack.max(1));
        roll.saturating_sub(defender.defence)
    }

    /// Percentage chance for `actor` to slip away from `opponent`.
    pub fn flee_chance(actor: &Actor, opponent: &Actor) -> u32 {
        let chance = 50 + 10 * (actor.speed as i64 - opponent.speed as i64);
        chance.clamp(10, 90) as u32
    }
}

fn do_damage(defender: &ActorRef, damage: u32) {
    let mut defender = defender.borrow_mut();
    defender.take_damage(damage);
    if defender.is_alive() {
        info!("{} takes {damage} damage, {} HP left.", defender.name, defender.hp);
    } else {
        info!("{} takes {damage} damage and falls.", defender.name);
    }
}

impl Fighting for MeleeCombat {
    fn resolve_attacker_defender<'a>(
        &'a self,
        attacker: &'a ActorRef,
        defender: &'a ActorRef,
    ) -> LocalBoxFuture<'a, ()> {
        async move {
            if !attacker.borrow().is_alive() || !defender.borrow().is_alive() {
                debug!("Skipping attack, someone is already down.");
                return;
            }
            let damage = self.roll_damage(&attacker.borrow(), &defender.borrow());
            debug!("{} attacks {}.", attacker.borrow().name, defender.borrow().name);
            do_damage(defender, damage);
        }
        .boxed_local()
    }

    fn try_to_run_from_opponent(&self, actor: &Actor, opponent: &Actor) -> bool {
        let chance = Self::flee_chance(actor, opponent);
        let escaped = self.rng.borrow_mut().gen_range(0..100) < chance;
        info!(
            "{} tries to run from {} ({chance}%): {}.",
            actor.name,
            opponent.name,
            if escaped { "escaped" } else { "caught" }
        );
        escaped
    }
}
