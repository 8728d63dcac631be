use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModexError, Result};
use super::agent::{Budget, Network, Strategy};
use super::brute_force::BruteForce;
use super::dynamic::DynamicProgramming;
use super::greedy::Greedy;

/// What a solver hands back: the chosen agents and the extremism it
/// believes the moderated network has.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub strategy: Strategy,
    pub extremism: f64,
}

/// Every solver is a pure function of the network and the budget.
pub trait Solver {
    fn solve(&self, network: &Network, budget: Budget) -> Result<Solution>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// enumerate all 2^n strategies
    BruteForce,
    /// exact 0/1 knapsack over (agent, budget)
    #[serde(rename = "dynamic")]
    DynamicProgramming,
    /// impact per effort, single pass
    Greedy,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::BruteForce,
        Algorithm::DynamicProgramming,
        Algorithm::Greedy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::BruteForce => "brute-force",
            Algorithm::DynamicProgramming => "dynamic",
            Algorithm::Greedy => "greedy",
        }
    }

    pub fn solver(self) -> &'static dyn Solver {
        match self {
            Algorithm::BruteForce => &BruteForce,
            Algorithm::DynamicProgramming => &DynamicProgramming,
            Algorithm::Greedy => &Greedy,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ModexError;

    fn from_str(s: &str) -> Result<Algorithm> {
        Algorithm::ALL.iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or_else(|| ModexError::UnknownAlgorithm(s.to_string()))
    }
}

/// The uniform result of one optimization run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub algorithm: Algorithm,
    pub budget: Budget,
    pub strategy: Strategy,
    pub extremism: f64,
    pub effort: u64,
    pub moderated: Network,
}

/// Run `algorithm` on `network`.
///
/// The effort and the moderated network are recomputed from the returned
/// strategy, so they are always consistent with it, whatever the solver
/// tracked internally.
pub fn optimize(network: &Network, budget: Budget, algorithm: Algorithm) -> Result<Outcome> {
    let Solution { strategy, extremism } = algorithm.solver().solve(network, budget)?;

    let effort = network.total_effort(&strategy)?;
    let moderated = network.moderate(&strategy)?;

    tracing::debug!(
        %algorithm,
        agents = network.len(),
        budget,
        effort,
        extremism,
        "optimization finished"
    );

    Ok(Outcome {
        algorithm,
        budget,
        strategy,
        extremism,
        effort,
        moderated,
    })
}
