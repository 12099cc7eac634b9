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

use anyhow::{Result, anyhow};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use log::{error, info};
use macroquad::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use dungeon_tactics::actor::{ActorId, ActorKind, ActorRef};
use dungeon_tactics::creature::Creature;
use dungeon_tactics::tile::TileRole;
use dungeon_tactics::{
    Campaign, GRID_SIZE, GridPoint, MeleeCombat, PointF, Stage, TurnEvent, TurnManager, World, WorldRef,
};

const GLIDE_SPEED: f32 = 240.0;
const ALERT_SECONDS: f64 = 2.5;

/// Draws the world with macroquad and plays the turn engine's animations
/// and dialogs frame by frame.
pub struct ScreenStage {
    world: WorldRef,
    gliding: RefCell<Option<(ActorId, PointF)>>,
    alert: RefCell<Option<(String, f64)>>,
}

impl ScreenStage {
    pub fn new(world: WorldRef) -> Self {
        Self {
            world,
            gliding: RefCell::new(None),
            alert: RefCell::new(None),
        }
    }

    /// Screen offset that keeps the hero in the middle of the window.
    fn camera_offset(&self) -> PointF {
        let world = self.world.borrow();
        let centre = match world.hero() {
            Some(hero) => self.drawn_position(&hero),
            None => PointF::zero(),
        };
        PointF::new(screen_width() / 2.0 - centre.x, screen_height() / 2.0 - centre.y)
    }

    fn drawn_position(&self, actor: &ActorRef) -> PointF {
        let actor = actor.borrow();
        match *self.gliding.borrow() {
            Some((id, position)) if id == actor.id => position,
            _ => actor.position,
        }
    }

    pub fn screen_to_grid(&self, x: f32, y: f32) -> GridPoint {
        let offset = self.camera_offset();
        dungeon_tactics::position::world_point_to_grid(PointF::new(x - offset.x, y - offset.y))
    }

    pub fn draw_scene(&self) {
        clear_background(BLACK);
        let offset = self.camera_offset();
        let world = self.world.borrow();
        let tile_map = world.get_tile_map();
        let top_left = PointF::new(-offset.x, -offset.y);
        let Some(region) = tile_map.visible_region(top_left, PointF::new(screen_width(), screen_height())) else {
            return;
        };

        for tile in tile_map.tiles_in_region(region) {
            let grid_point = tile.grid_point();
            let x = grid_point.x as f32 * GRID_SIZE + offset.x;
            let y = grid_point.y as f32 * GRID_SIZE + offset.y;
            let color = match tile.role() {
                TileRole::Obstacle => DARKGRAY,
                TileRole::Ground => Color::new(0.35, 0.3, 0.25, 1.0),
                TileRole::Entrance | TileRole::StairsUp => BLUE,
                TileRole::Exit | TileRole::StairsDown => GOLD,
            };
            draw_rectangle(x, y, GRID_SIZE - 1.0, GRID_SIZE - 1.0, color);

            if !world.is_visible(grid_point) {
                draw_rectangle(x, y, GRID_SIZE, GRID_SIZE, Color::new(0.0, 0.0, 0.0, 0.75));
                continue;
            }
            if tile_map.is_combat_tile(grid_point) {
                draw_rectangle_lines(x, y, GRID_SIZE, GRID_SIZE, 3.0, RED);
            } else if tile_map.movement_routes().contains_key(&grid_point) {
                draw_rectangle(x, y, GRID_SIZE, GRID_SIZE, Color::new(0.2, 0.9, 0.3, 0.25));
            }
        }

        for actor in world.get_actors() {
            let position = self.drawn_position(actor);
            let actor = actor.borrow();
            if !actor.is_hero() && !world.is_visible(actor.grid_point()) {
                continue;
            }
            let color = match actor.kind {
                ActorKind::Hero => SKYBLUE,
                ActorKind::Hostile => RED,
                ActorKind::Trader => GREEN,
                ActorKind::Prop => BROWN,
                ActorKind::HiddenArtefact => continue,
            };
            let color = if actor.is_alive() { color } else { GRAY };
            draw_circle(position.x + offset.x, position.y + offset.y, GRID_SIZE * 0.35, color);
        }

        self.draw_hud(&world);
    }

    fn draw_hud(&self, world: &World) {
        let mut offset = (10.0, 30.0);
        if let Some(hero) = world.hero() {
            let hero = hero.borrow();
            let true_red = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
            draw_text("HP", offset.0, offset.1, 30.0, true_red);
            let text_offset = offset.0 + measure_text("HP", None, 30, 1.0).width + 10.0;
            let text = format!("{}/{}", hero.hp, hero.max_hp);
            draw_text(&text, text_offset, offset.1, 30.0, if hero.hp < hero.max_hp / 2 { true_red } else { WHITE });
        }
        offset.1 += 30.0;
        draw_text(world.scene_name(), offset.0, offset.1, 24.0, GRAY);

        let expired = match &*self.alert.borrow() {
            Some((message, until)) => {
                draw_text(message, offset.0, screen_height() - 20.0, 24.0, YELLOW);
                get_time() > *until
            }
            None => false,
        };
        if expired {
            *self.alert.borrow_mut() = None;
        }
    }

    fn draw_dialog(&self, message: &str, button_label: &str) {
        let width = 480.0_f32.min(screen_width() - 20.0);
        let height = 140.0;
        let x = (screen_width() - width) / 2.0;
        let y = (screen_height() - height) / 2.0;
        draw_rectangle(x, y, width, height, Color::new(0.05, 0.05, 0.1, 0.95));
        draw_rectangle_lines(x, y, width, height, 2.0, WHITE);
        draw_text(message, x + 16.0, y + 40.0, 22.0, WHITE);
        let label = format!("[ {button_label} ]");
        let label_width = measure_text(&label, None, 26, 1.0).width;
        draw_text(&label, x + (width - label_width) / 2.0, y + height - 24.0, 26.0, YELLOW);
    }
}

impl Stage for ScreenStage {
    fn show_ok_dialog<'a>(&'a self, message: &'a str, button_label: &'a str) -> LocalBoxFuture<'a, ()> {
        async move {
            // The click that opened the dialog must not also close it.
            next_frame().await;
            loop {
                self.draw_scene();
                self.draw_dialog(message, button_label);
                if is_mouse_button_pressed(MouseButton::Left) || is_key_pressed(KeyCode::Enter) {
                    break;
                }
                next_frame().await;
            }
            next_frame().await;
        }
        .boxed_local()
    }

    fn alert(&self, message: &str) {
        info!("{message}");
        *self.alert.borrow_mut() = Some((message.to_string(), get_time() + ALERT_SECONDS));
    }

    fn glide<'a>(&'a self, actor: &'a ActorRef, waypoints: &'a [PointF]) -> LocalBoxFuture<'a, ()> {
        async move {
            let (id, mut position) = {
                let actor = actor.borrow();
                (actor.id, actor.position)
            };
            for waypoint in waypoints {
                while position.distance_to(waypoint) > f32::EPSILON {
                    position = position.moved_towards(waypoint, GLIDE_SPEED * get_frame_time());
                    *self.gliding.borrow_mut() = Some((id, position));
                    self.draw_scene();
                    next_frame().await;
                }
            }
            *self.gliding.borrow_mut() = None;
        }
        .boxed_local()
    }
}

pub async fn run(campaign: Campaign) -> Result<()> {
    let world = World::new().into_ref();
    let fighting = MeleeCombat::new(&campaign.config);
    let stage = ScreenStage::new(Rc::clone(&world));
    let manager = TurnManager::new(world, fighting, stage, campaign);

    manager.trigger(TurnEvent::StartGame).await?;

    loop {
        let stage = &manager.context().stage;
        stage.draw_scene();

        if is_key_pressed(KeyCode::Escape) {
            info!("Leaving the dungeon.");
            return Ok(());
        }

        if is_mouse_button_pressed(MouseButton::Left) {
            let (x, y) = mouse_position();
            let grid_point = stage.screen_to_grid(x, y);
            if let Err(err) = manager.click_grid_point(grid_point).await {
                error!("Turn failed: {err}");
                return Err(anyhow!(err));
            }
        }

        next_frame().await;
    }
}
