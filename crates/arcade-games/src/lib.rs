#![deny(warnings)]

//! The four finance mini-games and their registry.
//!
//! Each game module provides validated domain math, a pure reducer over the
//! shared event union, a view projection, and a mastery predicate. The
//! [`Registry`] is the host's only way to reach them.

pub mod budget;
pub mod elasticity;
pub mod npv;
pub mod tiles;

use arcade_core::{validate_meta, validate_unique_ids, Game, GameId, ValidationError};

/// Process-wide set of registered games.
pub struct Registry {
    games: Vec<Box<dyn Game>>,
}

impl Registry {
    /// Registry of the built-in games, validated at construction.
    pub fn builtin() -> Result<Self, ValidationError> {
        let games: Vec<Box<dyn Game>> = vec![
            Box::new(npv::NpvGame::new()),
            Box::new(budget::BudgetGame::new()),
            Box::new(elasticity::ElasticityGame::new()),
            Box::new(tiles::TileGame::new()),
        ];
        for game in &games {
            validate_meta(game.meta())?;
        }
        let ids: Vec<GameId> = games.iter().map(|g| g.meta().id.clone()).collect();
        validate_unique_ids(&ids)?;
        Ok(Self { games })
    }

    /// Look up a game by id; `None` is the "not found" dead-end.
    pub fn get(&self, id: &str) -> Option<&dyn Game> {
        self.games
            .iter()
            .find(|g| g.meta().id.0 == id)
            .map(|g| g.as_ref())
    }

    /// All registered games in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Game> {
        self.games.iter().map(|g| g.as_ref())
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
