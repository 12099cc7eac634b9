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

use thiserror::Error;

use crate::position::GridPoint;

/// Problems with a scene plan. A map without an exit cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map plan has no rows")]
    EmptyPlan,

    #[error("map plan has no exit tile")]
    MissingExit,

    #[error("map plan has neither an entrance nor a ground tile to enter on")]
    MissingEntrance,

    #[error("unknown map symbol {symbol:?} at {at}")]
    UnknownSymbol { symbol: char, at: GridPoint },
}

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("failed to parse campaign: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("campaign has no scenes")]
    NoScenes,

    #[error("scene {index} does not exist, the campaign has {count}")]
    SceneOutOfRange { index: usize, count: usize },
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Campaign(#[from] CampaignError),

    #[error("no hero is on the map")]
    NoHero,

    #[error("failed to restore the hero: {0}")]
    Revive(#[source] serde_json::Error),
}
