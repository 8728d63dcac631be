// the reconstruction compares table entries for exact equality, this is sound since
// both sides were produced by the very same floating point operations
#![allow(clippy::float_cmp)]

use std::convert::TryFrom;

use crate::error::{ModexError, Result};
use super::agent::{Budget, Network, Strategy};
use super::optimizer::{Solution, Solver};

/// Largest table we are willing to fill: 2^28 cells, i.e. 2 GiB of `f64`.
pub const MAX_CELLS: usize = 1 << 28;

/// Exact solver: a 0/1 knapsack which minimizes the squared opinions of the
/// agents which are *not* moderated.
#[derive(Clone, Copy, Debug, Default)]
pub struct DynamicProgramming;

/// `me[i][j]`: minimal sum of squared opinions over the first `i` agents,
/// if an effort of `j` may be spent on them.
#[derive(Clone, Debug)]
pub struct Table {
    me: Vec<Vec<f64>>,
    efforts: Vec<usize>,
}

impl Table {
    /// Fill the table for `network` up to `budget`.
    ///
    /// Columns beyond the total effort of all agents would all equal the column
    /// at the total effort, so the width is capped there.
    pub fn fill(network: &Network, budget: Budget) -> Result<Table> {
        let n = network.len();
        let width = budget.min(network.max_effort());
        let too_large = || ModexError::TableTooLarge { agents: n, budget };

        let width = usize::try_from(width)
            .ok()
            .and_then(|w| w.checked_add(1))
            .ok_or_else(too_large)?;
        let cells = (n + 1).checked_mul(width).ok_or_else(too_large)?;
        if cells > MAX_CELLS {
            return Err(too_large())
        }

        // an effort beyond the width can never be paid, saturate it into an unaffordable value
        let efforts: Vec<usize> = network.efforts()
            .into_iter()
            .map(|e| usize::try_from(e).unwrap_or(usize::MAX))
            .collect();

        // even below the cell limit the allocator may refuse, report that instead of aborting
        let alloc_row = || -> Result<Vec<f64>> {
            let mut row = Vec::new();
            row.try_reserve_exact(width).map_err(|_| too_large())?;
            Ok(row)
        };

        let mut me: Vec<Vec<f64>> = Vec::new();
        me.try_reserve_exact(n + 1).map_err(|_| too_large())?;
        let mut first = alloc_row()?;
        first.resize(width, 0.);
        me.push(first);

        for (i, agent) in network.agents().iter().enumerate() {
            let prev = &me[i];
            let e = efforts[i];
            let impact = agent.impact();
            let mut row = alloc_row()?;
            row.extend((0..width).map(|j| {
                let keep = prev[j] + impact;
                if j >= e {
                    keep.min(prev[j - e])
                } else {
                    keep
                }
            }));
            me.push(row);
        }

        Ok(Table { me, efforts })
    }

    pub fn agents(&self) -> usize {
        self.efforts.len()
    }

    /// the largest budget column stored in the table
    pub fn max_budget(&self) -> usize {
        self.me[0].len() - 1
    }

    /// minimal sum of squares reachable with the full budget
    pub fn optimum(&self) -> f64 {
        self.me[self.agents()][self.max_budget()]
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.me[i][j]
    }

    /// Walk back from the last agent, moderating whenever the table says
    /// moderating is (one of) the optimal choices.
    pub fn reconstruct(&self) -> Strategy {
        let n = self.agents();
        let mut strategy = Strategy::none(n);
        let mut j = self.max_budget();
        for i in (1..=n).rev() {
            let e = self.efforts[i - 1];
            if j >= e && self.me[i][j] == self.me[i - 1][j - e] {
                strategy.set(i - 1, true);
                j -= e;
            }
        }
        strategy
    }
}

impl Solver for DynamicProgramming {
    fn solve(&self, network: &Network, budget: Budget) -> Result<Solution> {
        let table = Table::fill(network, budget)?;
        let strategy = table.reconstruct();

        let n = network.len();
        let extremism = if n == 0 {
            0.
        } else {
            table.optimum().sqrt() / n as f64
        };

        tracing::debug!(
            agents = n,
            budget,
            columns = table.max_budget() + 1,
            optimum = table.optimum(),
            "dynamic programming table filled"
        );

        Ok(Solution { strategy, extremism })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Network {
        Network::from_pairs(&[(1.0, 0.0), (-0.8, 0.5), (0.3, 0.9)])
    }

    #[test]
    fn test_table_example() {
        let table = Table::fill(&example(), 1).unwrap();
        assert_eq!(table.max_budget(), 1);
        assert_eq!(table.get(0, 0), 0.);
        assert_eq!(table.get(0, 1), 0.);
        assert_eq!(table.get(1, 0), 1.);
        assert_eq!(table.get(1, 1), 0.);
        assert!((table.optimum() - 0.73).abs() < 1e-12);
        assert_eq!(table.reconstruct(), Strategy::from(vec![true, false, false]));
    }

    #[test]
    fn test_example() {
        let sol = DynamicProgramming.solve(&example(), 1).unwrap();
        assert_eq!(sol.strategy, Strategy::from(vec![true, false, false]));
        assert!((sol.extremism - 0.73f64.sqrt() / 3.).abs() < 1e-9);
    }

    #[test]
    fn test_zero_budget() {
        let net = example();
        let sol = DynamicProgramming.solve(&net, 0).unwrap();
        assert_eq!(sol.strategy, Strategy::none(3));
        assert!((sol.extremism - net.extremism()).abs() < 1e-12);
    }

    #[test]
    fn test_huge_budget_is_capped() {
        let net = example();
        let table = Table::fill(&net, u64::MAX).unwrap();
        assert_eq!(table.max_budget(), 3);
        let sol = DynamicProgramming.solve(&net, u64::MAX).unwrap();
        assert_eq!(sol.strategy, Strategy::all(3));
        assert_eq!(sol.extremism, 0.);
    }

    #[test]
    fn test_too_large_table_is_an_error() {
        // a single agent with an enormous effort and a budget of 2^62
        let (net, budget) = crate::io::read_network("1\n1e19,0\n4611686018427387904\n".as_bytes()).unwrap();
        assert_eq!(budget, 1 << 62);
        match DynamicProgramming.solve(&net, budget) {
            Err(ModexError::TableTooLarge { agents: 1, budget: b }) => assert_eq!(b, 1 << 62),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cell_limit() {
        let net = Network::from_pairs(&[(1e10, 0.), (1e10, 0.)]);
        assert!(Table::fill(&net, 1e10 as u64).is_err());
        // two rows of half the limit plus one column each are just too many
        let net = Network::from_pairs(&[(1e10, 0.)]);
        match Table::fill(&net, (MAX_CELLS / 2) as u64) {
            Err(ModexError::TableTooLarge { agents: 1, .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_ties_prefer_moderation() {
        // the agent without opinion costs nothing, moderating and leaving it are equally good
        let net = Network::from_pairs(&[(0.0, 0.4), (2.0, 0.5)]);
        let sol = DynamicProgramming.solve(&net, 0).unwrap();
        assert_eq!(sol.strategy, Strategy::from(vec![true, false]));
        assert!((sol.extremism - 1.).abs() < 1e-12);
    }

    #[test]
    fn test_knapsack_beats_density() {
        // by density agent 0 comes first, but the two expensive agents together remove more
        let net = Network::from_pairs(&[(2.0, 0.5), (3.0, 0.0), (-2.5, 0.0)]);
        assert_eq!(net.efforts(), vec![1, 3, 3]);
        let sol = DynamicProgramming.solve(&net, 6).unwrap();
        assert_eq!(sol.strategy, Strategy::from(vec![false, true, true]));
        assert!((sol.extremism - 4f64.sqrt() / 3.).abs() < 1e-12);
    }

    #[test]
    fn test_empty() {
        let sol = DynamicProgramming.solve(&Network::default(), 5).unwrap();
        assert!(sol.strategy.is_empty());
        assert_eq!(sol.extremism, 0.);
    }
}
