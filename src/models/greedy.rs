use std::cmp::Reverse;

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::error::Result;
use super::agent::{Budget, Network, Strategy};
use super::optimizer::{Solution, Solver};

/// Heuristic solver: moderate the agents which remove the most squared
/// opinion per unit of effort first. Fast, but not always optimal.
#[derive(Clone, Copy, Debug, Default)]
pub struct Greedy;

#[derive(Clone, Copy, Debug)]
struct Candidate {
    idx: usize,
    effort: u64,
    impact: f64,
    density: f64,
}

impl Solver for Greedy {
    fn solve(&self, network: &Network, budget: Budget) -> Result<Solution> {
        let n = network.len();
        let mut strategy = Strategy::none(n);

        // agents which cost nothing are always worth moderating
        let (free, candidates): (Vec<_>, Vec<_>) = network.agents().iter()
            .enumerate()
            .map(|(idx, a)| {
                let effort = a.effort();
                let impact = a.impact();
                let density = if effort > 0 { impact / effort as f64 } else { f64::INFINITY };
                Candidate { idx, effort, impact, density }
            })
            .partition(|c| c.effort == 0);

        for c in &free {
            strategy.set(c.idx, true);
        }

        // stable sort, equal densities keep the network order
        let ranked = candidates.into_iter()
            .sorted_by_key(|c| Reverse(OrderedFloat(c.density)));

        let mut used = 0u64;
        let mut skipped_squares = 0.;
        let mut skipped = 0usize;
        for c in ranked {
            match used.checked_add(c.effort) {
                Some(total) if total <= budget => {
                    strategy.set(c.idx, true);
                    used = total;
                }
                _ => {
                    skipped_squares += c.impact;
                    skipped += 1;
                }
            }
        }

        let extremism = if n == 0 {
            0.
        } else {
            f64::sqrt(skipped_squares) / n as f64
        };

        tracing::debug!(
            agents = n,
            budget,
            free = free.len(),
            skipped,
            used,
            "greedy pass done"
        );

        Ok(Solution { strategy, extremism })
    }
}
