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

//! Turn engine: hero turns, computer turns and what happens in between.

pub mod context;
pub mod state;

use log::debug;
use std::cell::Cell;

use crate::actor::ActorRef;
use crate::campaign::Campaign;
use crate::error::TurnError;
use crate::maps::world::WorldRef;
use crate::position::GridPoint;

pub use context::{Fighting, Stage, TurnContext};
pub use state::{TurnEvent, TurnState};

use state::Transition;

/// What became of a triggered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    /// Another event was still being handled.
    Dropped,
    /// The click did not land on a highlighted tile.
    Ignored,
}

/// Drives the turn states. One event is handled at a time; events triggered
/// while another is in flight are dropped, not queued.
pub struct TurnManager<F: Fighting, S: Stage> {
    context: TurnContext<F, S>,
    state: Cell<TurnState>,
    ignore_events: Cell<bool>,
}

impl<F: Fighting, S: Stage> TurnManager<F, S> {
    pub fn new(world: WorldRef, fighting: F, stage: S, campaign: Campaign) -> Self {
        Self {
            context: TurnContext::new(world, fighting, stage, campaign),
            state: Cell::new(TurnState::WaitingToStart),
            ignore_events: Cell::new(false),
        }
    }

    pub fn state(&self) -> TurnState {
        self.state.get()
    }

    pub fn context(&self) -> &TurnContext<F, S> {
        &self.context
    }

    pub fn world(&self) -> &WorldRef {
        &self.context.world
    }

    pub fn hero(&self) -> Option<ActorRef> {
        self.context.hero().ok()
    }

    pub fn is_busy(&self) -> bool {
        self.ignore_events.get()
    }

    pub async fn trigger(&self, event: TurnEvent) -> Result<Dispatch, TurnError> {
        if self.ignore_events.get() {
            debug!("Dropping {event:?}, still busy in {:?}.", self.state.get());
            return Ok(Dispatch::Dropped);
        }

        self.ignore_events.set(true);
        let result = self.dispatch(event).await;
        self.ignore_events.set(false);
        result.map(|()| Dispatch::Handled)
    }

    async fn dispatch(&self, event: TurnEvent) -> Result<(), TurnError> {
        let mut transition = self.state.get().handle(event, &self.context).await?;
        while let Transition::To(next) = transition {
            debug!("{:?} -> {next:?}", self.state.get());
            self.state.set(next);
            transition = next.enter(&self.context).await?;
        }
        Ok(())
    }

    /// Feeds a click on `grid_point` through the tile map's highlight filter
    /// and on to the current state.
    pub async fn click_grid_point(&self, grid_point: GridPoint) -> Result<Dispatch, TurnError> {
        let click = self.context.world.borrow().get_tile_map().click(grid_point);
        match click {
            Some(click) => self.trigger(TurnEvent::from(click)).await,
            None => Ok(Dispatch::Ignored),
        }
    }
}
