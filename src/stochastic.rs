// Random pruning of turn symbols to break up the regularity of a fully
// expanded plant. Each `+` or `-` is an independent Bernoulli trial;
// branch structure, forward moves and nonterminals are never touched.

use rand::Rng;

use crate::error::TreeError;
use crate::grammar::{Axiom, TURN_LEFT, TURN_RIGHT};

pub const DEFAULT_DROP_PROBABILITY : f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StochasticFilter {
    drop_probability : f64
}

impl StochasticFilter {
    pub fn init(drop_probability : f64) -> Result<StochasticFilter, TreeError> {
        if !(0.0..=1.0).contains(&drop_probability) {
            return Err(TreeError::InvalidConfig(format!(
                "drop probability {} outside [0, 1]",
                drop_probability
            )));
        }
        Ok(StochasticFilter { drop_probability })
    }

    pub fn drop_probability(self : &Self) -> f64 {
        self.drop_probability
    }

    pub fn apply<R : Rng>(self : &Self, axiom : &Axiom, rng : &mut R) -> Axiom {
        let mut dropped = 0usize;
        let filtered : String = axiom
            .symbols()
            .filter(|&symbol| {
                if symbol != TURN_LEFT && symbol != TURN_RIGHT {
                    return true;
                }
                let keep = rng.gen::<f64>() >= self.drop_probability;
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .collect();
        tracing::debug!(dropped, p = self.drop_probability, "filtered turn symbols");
        Axiom::new(filtered)
    }
}

impl Default for StochasticFilter {
    fn default() -> Self {
        StochasticFilter { drop_probability : DEFAULT_DROP_PROBABILITY }
    }
}
