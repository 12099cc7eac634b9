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
use serde_json::from_str;

use crate::actor::ActorTemplate;
use crate::config::TurnConfig;
use crate::error::CampaignError;
use crate::position::GridPoint;

/// An actor to place when a scene loads. Without `at` it lands on a random
/// free ground tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorSpawn {
    #[serde(flatten)]
    pub template: ActorTemplate,
    #[serde(default)]
    pub at: Option<GridPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDefinition {
    pub name: String,
    #[serde(default)]
    pub intro: Option<String>,
    pub plan: Vec<String>,
    #[serde(default)]
    pub actors: Vec<ActorSpawn>,
}

/// The hero and the ordered scenes they fight through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub hero: ActorTemplate,
    pub scenes: Vec<SceneDefinition>,
    #[serde(default)]
    pub config: TurnConfig,
}

impl Campaign {
    pub fn new(hero: ActorTemplate, scenes: Vec<SceneDefinition>) -> Result<Self, CampaignError> {
        if scenes.is_empty() {
            return Err(CampaignError::NoScenes);
        }
        Ok(Self {
            hero,
            scenes,
            config: TurnConfig::default(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CampaignError> {
        let campaign: Campaign = from_str(json)?;
        if campaign.scenes.is_empty() {
            return Err(CampaignError::NoScenes);
        }
        Ok(campaign)
    }

    pub fn with_config(mut self, config: TurnConfig) -> Self {
        self.config = config;
        self
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn scene(&self, index: usize) -> Result<&SceneDefinition, CampaignError> {
        self.scenes.get(index).ok_or(CampaignError::SceneOutOfRange {
            index,
            count: self.scenes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorKind;

    const CAMPAIGN: &str = r#"{
        "hero": { "name": "Ayla", "kind": "Hero", "max_hp": 12, "attack": 4, "max_tiles_per_move": 3 },
        "scenes": [
            {
                "name": "Cellar",
                "plan": ["E..", "..X"],
                "actors": [
                    { "name": "Rat", "kind": "Hostile", "max_tiles_per_move": 2, "at": { "x": 2, "y": 0 } },
                    { "name": "Chest", "kind": "Prop" }
                ]
            }
        ],
        "config": { "seed": 9 }
    }"#;

    #[test]
    fn parses_campaign_json() {
        let campaign = Campaign::from_json(CAMPAIGN).unwrap();
        assert_eq!(campaign.hero.kind, ActorKind::Hero);
        assert_eq!(campaign.hero.defence, 0);
        assert_eq!(campaign.scene_count(), 1);

        let scene = campaign.scene(0).unwrap();
        assert_eq!(scene.actors[0].at, Some(GridPoint::new(2, 0)));
        assert_eq!(scene.actors[0].template.max_tiles_per_move, 2);
        assert_eq!(scene.actors[1].at, None);
        assert_eq!(scene.actors[1].template.max_hp, 1);

        assert_eq!(campaign.config.seed, Some(9));
        assert_eq!(campaign.config.too_many_turns_to_reach, 2);
        assert!(matches!(
            campaign.scene(3),
            Err(CampaignError::SceneOutOfRange { index: 3, count: 1 })
        ));
    }

    #[test]
    fn campaign_needs_scenes() {
        let json = r#"{ "hero": { "name": "Ayla", "kind": "Hero" }, "scenes": [] }"#;
        assert!(matches!(Campaign::from_json(json), Err(CampaignError::NoScenes)));
        assert!(matches!(Campaign::from_json("{"), Err(CampaignError::Parse(_))));
    }
}
