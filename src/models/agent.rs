use std::fmt;
use std::ops::Index;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{ModexError, Result};

/// upper bound on the total effort a strategy may cost
pub type Budget = u64;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub opinion: f64,
    pub receptivity: f64,
}

impl Agent {
    pub fn new(opinion: f64, receptivity: f64) -> Agent {
        Agent {
            opinion,
            receptivity,
        }
    }

    /// Integer cost to moderate this agent: `ceil(|x| (1 - r))`.
    ///
    /// A receptivity above one would make the cost negative, we clamp it to zero.
    pub fn effort(&self) -> u64 {
        let raw = (self.opinion.abs() * (1. - self.receptivity)).ceil();
        if raw > 0. {
            raw as u64
        } else {
            0
        }
    }

    /// contribution to the extremism if this agent is left alone
    pub fn impact(&self) -> f64 {
        self.opinion * self.opinion
    }

    pub fn moderated(&self) -> Agent {
        Agent::new(0., self.receptivity)
    }
}

/// A decision vector: `true` at index `i` means agent `i` is moderated.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Strategy(Vec<bool>);

impl Strategy {
    /// moderate nobody
    pub fn none(n: usize) -> Strategy {
        Strategy(vec![false; n])
    }

    /// moderate everybody
    pub fn all(n: usize) -> Strategy {
        Strategy(vec![true; n])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn set(&mut self, idx: usize, moderate: bool) {
        self.0[idx] = moderate;
    }

    pub fn iter(&self) -> impl Iterator<Item = &bool> {
        self.0.iter()
    }

    pub fn moderated_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter()
            .enumerate()
            .filter(|(_, m)| **m)
            .map(|(i, _)| i)
    }

    pub fn count_moderated(&self) -> usize {
        self.0.iter().filter(|&&m| m).count()
    }
}

impl From<Vec<bool>> for Strategy {
    fn from(decisions: Vec<bool>) -> Strategy {
        Strategy(decisions)
    }
}

impl Index<usize> for Strategy {
    type Output = bool;

    fn index(&self, idx: usize) -> &bool {
        &self.0[idx]
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string_list = self.0.iter()
            .map(|&m| if m { "1" } else { "0" })
            .join(", ");
        write!(f, "[{}]", string_list)
    }
}

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    agents: Vec<Agent>,
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Network {{ N: {}, agents: {:?} }}", self.agents.len(), self.agents)
    }
}

impl From<Vec<Agent>> for Network {
    fn from(agents: Vec<Agent>) -> Network {
        Network { agents }
    }
}

impl Network {
    pub fn new(agents: Vec<Agent>) -> Network {
        Network { agents }
    }

    /// convenience constructor from `(opinion, receptivity)` pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Network {
        pairs.iter()
            .map(|&(x, r)| Agent::new(x, r))
            .collect::<Vec<_>>()
            .into()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn efforts(&self) -> Vec<u64> {
        self.agents.iter().map(Agent::effort).collect()
    }

    /// effort needed to moderate every agent
    pub fn max_effort(&self) -> u64 {
        self.agents.iter()
            .map(Agent::effort)
            .fold(0u64, |acc, e| acc.saturating_add(e))
    }

    /// `sqrt(sum x_i^2) / n`, zero for an empty network
    pub fn extremism(&self) -> f64 {
        if self.agents.is_empty() {
            return 0.
        }
        let sum: f64 = self.agents.iter().map(Agent::impact).sum();
        sum.sqrt() / self.agents.len() as f64
    }

    fn check(&self, strategy: &Strategy) -> Result<()> {
        if strategy.len() != self.agents.len() {
            return Err(ModexError::InvalidStrategyLength {
                expected: self.agents.len(),
                actual: strategy.len(),
            })
        }
        Ok(())
    }

    pub fn total_effort(&self, strategy: &Strategy) -> Result<u64> {
        self.check(strategy)?;
        Ok(strategy.moderated_indices()
            .map(|i| self.agents[i].effort())
            .fold(0u64, |acc, e| acc.saturating_add(e)))
    }

    /// The network after applying `strategy`. The original is left untouched.
    pub fn moderate(&self, strategy: &Strategy) -> Result<Network> {
        self.check(strategy)?;
        let agents = self.agents.iter()
            .zip(strategy.iter())
            .map(|(a, &m)| if m { a.moderated() } else { *a })
            .collect();
        Ok(Network { agents })
    }
}
