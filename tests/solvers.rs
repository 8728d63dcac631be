extern crate modex;
use modex::{optimize, Algorithm, ModexError, Network, PopulationModel, Strategy};

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    const TOL: f64 = 1e-9;

    /// small random networks with efforts between 1 and 4
    fn networks() -> Vec<Network> {
        let model = PopulationModel::Uniform(4.);
        (0..30)
            .map(|seed| {
                let mut rng = Pcg64::seed_from_u64(seed);
                model.gen_network(1 + seed as usize % 10, &mut rng)
            })
            .collect()
    }

    #[test]
    fn test_dynamic_agrees_with_brute_force() {
        for net in networks() {
            for budget in 0..=net.max_effort() + 1 {
                let exact = optimize(&net, budget, Algorithm::BruteForce).unwrap();
                let dp = optimize(&net, budget, Algorithm::DynamicProgramming).unwrap();
                assert!(
                    (exact.extremism - dp.extremism).abs() < TOL,
                    "{:?} budget {}: {} vs {}", net, budget, exact.extremism, dp.extremism
                );
            }
        }
    }

    #[test]
    fn test_greedy_is_never_better_than_optimal() {
        for net in networks() {
            for budget in 0..=net.max_effort() {
                let dp = optimize(&net, budget, Algorithm::DynamicProgramming).unwrap();
                let greedy = optimize(&net, budget, Algorithm::Greedy).unwrap();
                assert!(greedy.extremism >= dp.extremism - TOL);
            }
        }
    }

    #[test]
    fn test_budget_respected_and_effort_recomputed() {
        for net in networks() {
            for budget in 0..=net.max_effort() {
                for &a in Algorithm::ALL.iter() {
                    let out = optimize(&net, budget, a).unwrap();
                    assert_eq!(out.strategy.len(), net.len());
                    assert_eq!(out.effort, net.total_effort(&out.strategy).unwrap());
                    assert!(out.effort <= budget, "{} exceeds budget {}", a, budget);
                    assert_eq!(out.moderated, net.moderate(&out.strategy).unwrap());
                    // the reported extremism is the one of the moderated network
                    assert!((out.extremism - out.moderated.extremism()).abs() < TOL);
                }
            }
        }
    }

    #[test]
    fn test_zero_budget_moderates_nobody() {
        for net in networks() {
            for &a in Algorithm::ALL.iter() {
                let out = optimize(&net, 0, a).unwrap();
                assert_eq!(out.strategy, Strategy::none(net.len()), "{}", a);
                assert!((out.extremism - net.extremism()).abs() < TOL);
                assert_eq!(out.effort, 0);
            }
        }
    }

    #[test]
    fn test_full_budget_moderates_everybody() {
        for net in networks() {
            // otherwise leaving an agent alone would be just as good
            assert!(net.agents().iter().all(|a| a.opinion != 0.));
            let budget = net.max_effort();
            for &a in Algorithm::ALL.iter() {
                let out = optimize(&net, budget, a).unwrap();
                assert_eq!(out.strategy, Strategy::all(net.len()), "{}", a);
                assert_eq!(out.extremism, 0.);
                assert_eq!(out.effort, budget);
            }
        }
    }

    #[test]
    fn test_full_budget_with_neutral_agent() {
        let net = Network::from_pairs(&[(0.0, 0.5), (1.5, 0.0), (-0.5, 0.5)]);
        let budget = net.max_effort();
        for &a in Algorithm::ALL.iter() {
            let out = optimize(&net, budget, a).unwrap();
            assert_eq!(out.extremism, 0., "{}", a);
            assert!(out.strategy[1] && out.strategy[2], "{}", a);
        }
        // the neutral agent only costs nothing, the exhaustive search has no reason to touch it
        let brute = optimize(&net, budget, Algorithm::BruteForce).unwrap();
        assert!(!brute.strategy[0]);
        let dynamic = optimize(&net, budget, Algorithm::DynamicProgramming).unwrap();
        assert_eq!(dynamic.strategy, Strategy::all(3));
    }

    #[test]
    fn test_table_too_large() {
        let net = Network::from_pairs(&[(1e19, 0.)]);
        match optimize(&net, 1 << 62, Algorithm::DynamicProgramming) {
            Err(ModexError::TableTooLarge { agents: 1, .. }) => (),
            other => panic!("unexpected {:?}", other),
        }
        // the other solvers do not need a table
        let greedy = optimize(&net, 1 << 62, Algorithm::Greedy).unwrap();
        assert_eq!(greedy.strategy, Strategy::none(1));
        assert!((greedy.extremism / 1e19 - 1.).abs() < 1e-12);
    }

    #[test]
    fn test_moderation_is_idempotent() {
        for net in networks() {
            let out = optimize(&net, net.max_effort() / 2, Algorithm::DynamicProgramming).unwrap();
            let twice = out.moderated.moderate(&out.strategy).unwrap();
            assert_eq!(twice, out.moderated);
        }
    }

    #[test]
    fn test_mismatched_strategy_is_reported() {
        let net = Network::from_pairs(&[(0.5, 0.5), (0.5, 0.5)]);
        assert!(net.total_effort(&Strategy::none(1)).is_err());
    }
}
