use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModexError {
    #[error("strategy has {actual} entries, but the network has {expected} agents")]
    InvalidStrategyLength { expected: usize, actual: usize },

    #[error("brute force can enumerate at most {max} agents, got {agents}")]
    NetworkTooLarge { agents: usize, max: usize },

    #[error("dynamic programming table for {agents} agents and budget {budget} does not fit into memory")]
    TableTooLarge { agents: usize, budget: u64 },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown algorithm '{0}', expected one of: brute-force, dynamic, greedy")]
    UnknownAlgorithm(String),

    #[error("unknown population model '{0}', expected one of: uniform, polarized")]
    UnknownPopulation(String),
}

pub type Result<T> = std::result::Result<T, ModexError>;
