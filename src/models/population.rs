use std::str::FromStr;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{ModexError, Result};
use super::agent::{Agent, Network};

#[derive(PartialEq, Clone, Debug)]
pub enum PopulationModel {
    /// opinions uniform in [-scale, scale], uniform receptivities
    Uniform(f64),
    /// two camps: opinions Gaussian around -scale and +scale with the given spread,
    /// uniform receptivities
    Polarized(f64, f64),
}

impl FromStr for PopulationModel {
    type Err = ModexError;

    /// Only the name is parsed, parameters are filled in with defaults.
    fn from_str(s: &str) -> Result<PopulationModel> {
        match s {
            "uniform" => Ok(PopulationModel::Uniform(1.)),
            "polarized" => Ok(PopulationModel::Polarized(1., 0.1)),
            _ => Err(ModexError::UnknownPopulation(s.to_string())),
        }
    }
}

fn stretch(x: f64, low: f64, high: f64) -> f64 {
    x*(high-low)+low
}

impl PopulationModel {
    /// the same model with opinions scaled by `scale`
    pub fn with_scale(self, scale: f64) -> PopulationModel {
        match self {
            PopulationModel::Uniform(_) => PopulationModel::Uniform(scale),
            PopulationModel::Polarized(_, spread) => PopulationModel::Polarized(scale, spread),
        }
    }

    fn gen_opinion(&self, rng: &mut impl Rng) -> f64 {
        match *self {
            PopulationModel::Uniform(scale) => stretch(rng.gen(), -scale, scale),
            PopulationModel::Polarized(scale, spread) => {
                let center = if rng.gen::<f64>() < 0.5 { -scale } else { scale };
                // a non-positive spread degenerates to both camps sitting exactly at their center
                match Normal::new(center, spread) {
                    Ok(gauss) if spread > 0. => gauss.sample(rng),
                    _ => center,
                }
            }
        }
    }

    pub fn gen_agent(&self, rng: &mut impl Rng) -> Agent {
        let opinion = self.gen_opinion(rng);
        let receptivity = rng.gen();
        Agent::new(opinion, receptivity)
    }

    pub fn gen_network(&self, n: usize, rng: &mut impl Rng) -> Network {
        (0..n)
            .map(|_| self.gen_agent(rng))
            .collect::<Vec<_>>()
            .into()
    }
}
