use crate::error::{ModexError, Result};
use super::agent::{Budget, Network, Strategy};
use super::optimizer::{Solution, Solver};

/// the enumeration counter is a `u64`
pub const MAX_AGENTS: usize = 63;

/// Tries every strategy. Only feasible for small networks, but exact, so it
/// serves as the reference for the other solvers.
#[derive(Clone, Copy, Debug, Default)]
pub struct BruteForce;

/// the best strategy found by the enumeration, with everything we know about it
#[derive(Clone, Debug, PartialEq)]
pub struct Incumbent {
    pub strategy: Strategy,
    pub extremism: f64,
    pub effort: u64,
    pub network: Network,
}

/// Decode the counter `k` into a strategy: agent 0 is the most significant bit,
/// so counting up from zero visits the strategies in lexicographic order.
fn decode(k: u64, n: usize) -> Strategy {
    (0..n)
        .map(|i| (k >> (n - 1 - i)) & 1 == 1)
        .collect::<Vec<_>>()
        .into()
}

impl BruteForce {
    pub fn search(&self, network: &Network, budget: Budget) -> Result<Incumbent> {
        let n = network.len();
        if n > MAX_AGENTS {
            return Err(ModexError::NetworkTooLarge { agents: n, max: MAX_AGENTS })
        }

        // k = 0 moderates nobody, costs nothing and is always feasible
        let empty = Strategy::none(n);
        let mut best = Incumbent {
            extremism: network.extremism(),
            effort: 0,
            network: network.clone(),
            strategy: empty,
        };

        let mut feasible = 1u64;
        for k in 1..(1u64 << n) {
            let strategy = decode(k, n);
            let effort = network.total_effort(&strategy)?;
            if effort > budget {
                continue
            }
            feasible += 1;

            let moderated = network.moderate(&strategy)?;
            let extremism = moderated.extremism();
            // only strict improvements, the first strategy in counting order wins ties
            if extremism < best.extremism {
                best = Incumbent {
                    strategy,
                    extremism,
                    effort,
                    network: moderated,
                };
            }
        }

        tracing::debug!(
            agents = n,
            budget,
            feasible,
            total = 1u64 << n,
            "brute force enumeration done"
        );

        Ok(best)
    }
}

impl Solver for BruteForce {
    fn solve(&self, network: &Network, budget: Budget) -> Result<Solution> {
        let Incumbent { strategy, extremism, .. } = self.search(network, budget)?;
        Ok(Solution { strategy, extremism })
    }
}
