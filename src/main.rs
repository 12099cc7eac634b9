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

mod game;

use anyhow::anyhow;
use dungeon_tactics::Campaign;
use log::error;
use macroquad::prelude::*;

const CAMPAIGN_PATH: &str = "assets/campaign.json";

fn window_conf() -> Conf {
    Conf {
        window_title: "Dungeon Tactics".to_string(),
        window_width: 1000,
        window_height: 720,
        fullscreen: false,
        ..Default::default()
    }
}

async fn load_campaign() -> anyhow::Result<Campaign> {
    let json = load_string(CAMPAIGN_PATH)
        .await
        .map_err(|err| anyhow!("failed to read {CAMPAIGN_PATH}: {err:?}"))?;
    Ok(Campaign::from_json(&json)?)
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let result = match load_campaign().await {
        Ok(campaign) => game::run(campaign).await,
        Err(err) => Err(err),
    };
    if let Err(err) = result {
        error!("{err:#}");
    }
}
