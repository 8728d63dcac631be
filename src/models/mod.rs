mod agent;
mod brute_force;
mod dynamic;
mod greedy;
mod optimizer;
mod population;

pub use agent::{Agent, Budget, Network, Strategy};
pub use brute_force::{BruteForce, Incumbent, MAX_AGENTS};
pub use dynamic::{DynamicProgramming, Table, MAX_CELLS};
pub use greedy::Greedy;
pub use optimizer::{optimize, Algorithm, Outcome, Solution, Solver};
pub use population::PopulationModel;
