mod models;
pub mod io;
pub mod error;

pub use error::{ModexError, Result};
pub use models::{Agent, Budget, Network, Strategy};
pub use models::{optimize, Algorithm, Outcome, Solution, Solver};
pub use models::{BruteForce, Incumbent, MAX_AGENTS};
pub use models::{DynamicProgramming, Table, MAX_CELLS};
pub use models::Greedy;
pub use models::PopulationModel;
