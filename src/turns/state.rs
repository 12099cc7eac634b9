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

use log::{debug, error, info};

use crate::error::TurnError;
use crate::tile::{TileClick, TileRole};
use crate::turns::context::{
    ENTRANCE_MESSAGE, Fighting, GAME_COMPLETED_MESSAGE, GAME_OVER_MESSAGE, Stage, TurnContext, WELCOME_MESSAGE,
};

#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    StartGame,
    ClickedFreeGround(TileClick),
    ClickedExit(TileClick),
    ClickedEntrance(TileClick),
}

impl From<TileClick> for TurnEvent {
    fn from(click: TileClick) -> Self {
        match click.role {
            TileRole::Exit => TurnEvent::ClickedExit(click),
            TileRole::Entrance => TurnEvent::ClickedEntrance(click),
            _ => TurnEvent::ClickedFreeGround(click),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnState {
    WaitingToStart,
    AtStart,
    HeroTurnIdle,
    HeroTurnFighting,
    ComputerTurnIdle,
    ComputerTurnFighting,
    AtGameOver,
    AtGameCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Stay,
    To(TurnState),
}

impl TurnState {
    /// Runs on arrival in this state. Transient states hand over to the next
    /// state from here.
    pub(crate) async fn enter<F: Fighting, S: Stage>(self, ctx: &TurnContext<F, S>) -> Result<Transition, TurnError> {
        match self {
            TurnState::WaitingToStart => Ok(Transition::Stay),
            TurnState::AtStart => {
                ctx.stage.show_ok_dialog(WELCOME_MESSAGE, "Enter").await;
                ctx.new_game().await?;
                Ok(Transition::To(TurnState::HeroTurnIdle))
            }
            TurnState::HeroTurnIdle | TurnState::HeroTurnFighting => {
                ctx.publish_hero_highlights()?;
                Ok(Transition::Stay)
            }
            TurnState::ComputerTurnIdle => {
                ctx.run_computer_turn(false).await?;
                after_computer_turn(ctx)
            }
            TurnState::ComputerTurnFighting => {
                ctx.run_computer_turn(true).await?;
                after_computer_turn(ctx)
            }
            TurnState::AtGameOver => {
                ctx.stage.show_ok_dialog(GAME_OVER_MESSAGE, "Try again").await;
                ctx.new_game().await?;
                Ok(Transition::To(TurnState::HeroTurnIdle))
            }
            TurnState::AtGameCompleted => {
                ctx.stage.show_ok_dialog(GAME_COMPLETED_MESSAGE, "Play again").await;
                ctx.new_game().await?;
                Ok(Transition::To(TurnState::HeroTurnIdle))
            }
        }
    }

    pub(crate) async fn handle<F: Fighting, S: Stage>(
        self,
        event: TurnEvent,
        ctx: &TurnContext<F, S>,
    ) -> Result<Transition, TurnError> {
        match (self, event) {
            (TurnState::WaitingToStart, TurnEvent::StartGame) => Ok(Transition::To(TurnState::AtStart)),

            (TurnState::HeroTurnIdle, TurnEvent::ClickedFreeGround(click)) => {
                if click.combat {
                    error!("Combat click on {} while nobody is fighting.", click.grid_point);
                    return Ok(Transition::Stay);
                }
                let Some(route) = click.route else {
                    return Ok(Transition::Stay);
                };
                ctx.move_hero_along(&route).await?;
                Ok(Transition::To(TurnState::ComputerTurnIdle))
            }

            (TurnState::HeroTurnFighting, TurnEvent::ClickedFreeGround(click)) => {
                if click.combat {
                    ctx.hero_attacks(click.grid_point).await?;
                    return Ok(Transition::To(computer_turn_for(ctx)?));
                }
                let Some(route) = click.route else {
                    return Ok(Transition::Stay);
                };
                if !ctx.hero_escapes()? {
                    info!("The hero could not get away.");
                    ctx.world.borrow_mut().get_tile_map_mut().clear_highlights();
                    return Ok(Transition::To(TurnState::ComputerTurnFighting));
                }
                ctx.move_hero_along(&route).await?;
                Ok(Transition::To(computer_turn_for(ctx)?))
            }

            (TurnState::HeroTurnIdle | TurnState::HeroTurnFighting, TurnEvent::ClickedExit(click)) => {
                let Some(route) = click.route else {
                    return Ok(Transition::Stay);
                };
                ctx.move_hero_along(&route).await?;
                if ctx.has_next_scene() {
                    ctx.start_scene(ctx.scene_index() + 1).await?;
                    Ok(Transition::To(TurnState::HeroTurnIdle))
                } else {
                    Ok(Transition::To(TurnState::AtGameCompleted))
                }
            }

            (TurnState::HeroTurnIdle | TurnState::HeroTurnFighting, TurnEvent::ClickedEntrance(_)) => {
                ctx.stage.alert(ENTRANCE_MESSAGE);
                Ok(Transition::Stay)
            }

            (state, event) => {
                debug!("{state:?} ignores {event:?}.");
                Ok(Transition::Stay)
            }
        }
    }
}

/// Fighting carries on into the computer turn while anyone is still next to the hero.
fn computer_turn_for<F: Fighting, S: Stage>(ctx: &TurnContext<F, S>) -> Result<TurnState, TurnError> {
    if ctx.hero_participants()?.is_empty() {
        Ok(TurnState::ComputerTurnIdle)
    } else {
        Ok(TurnState::ComputerTurnFighting)
    }
}

fn after_computer_turn<F: Fighting, S: Stage>(ctx: &TurnContext<F, S>) -> Result<Transition, TurnError> {
    if !ctx.hero_is_alive()? {
        return Ok(Transition::To(TurnState::AtGameOver));
    }
    if ctx.hero_participants()?.is_empty() {
        Ok(Transition::To(TurnState::HeroTurnIdle))
    } else {
        Ok(Transition::To(TurnState::HeroTurnFighting))
    }
}
