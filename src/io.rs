use std::convert::TryFrom;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Serialize;

use crate::error::{ModexError, Result};
use crate::models::{Agent, Budget, Network, Outcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

fn parse_error(line: usize, reason: impl Into<String>) -> ModexError {
    ModexError::Parse { line, reason: reason.into() }
}

fn parse_real(field: &str, what: &str, line: usize) -> Result<f64> {
    let x: f64 = field.trim().parse()
        .map_err(|_| parse_error(line, format!("{} '{}' is not a number", what, field.trim())))?;
    if !x.is_finite() {
        return Err(parse_error(line, format!("{} '{}' is not finite", what, field.trim())))
    }
    Ok(x)
}

fn parse_agent(content: &str, line: usize) -> Result<Agent> {
    let fields: Vec<&str> = content.split(',').collect();
    if fields.len() != 2 {
        return Err(parse_error(line, format!("expected 'opinion,receptivity', got '{}'", content)))
    }
    let opinion = parse_real(fields[0], "opinion", line)?;
    let receptivity = parse_real(fields[1], "receptivity", line)?;
    Ok(Agent::new(opinion, receptivity))
}

/// Read a network in the plain text format:
///
/// ```text
/// 3
/// 1.0,0.0
/// -0.8,0.5
/// 0.3,0.9
/// 1
/// ```
///
/// the number of agents, one `opinion,receptivity` line per agent and the budget.
/// Blank lines are ignored everywhere.
pub fn read_network<R: BufRead>(reader: R) -> Result<(Network, Budget)> {
    let mut lines = reader.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l));

    // next non-blank line with its 1-based line number
    let mut next_line = || -> Result<Option<(usize, String)>> {
        for (num, line) in &mut lines {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some((num, trimmed.to_string())))
            }
        }
        Ok(None)
    };

    let (num, content) = next_line()?
        .ok_or_else(|| parse_error(1, "missing number of agents"))?;
    let n: usize = content.parse()
        .map_err(|_| parse_error(num, format!("number of agents '{}' is not a non-negative integer", content)))?;

    // do not trust the header with the allocation
    let mut agents = Vec::with_capacity(n.min(1 << 16));
    let mut last = num;
    for k in 0..n {
        let (num, content) = next_line()?
            .ok_or_else(|| parse_error(last + 1, format!("expected {} agents, found only {}", n, k)))?;
        agents.push(parse_agent(&content, num)?);
        last = num;
    }

    let (num, content) = next_line()?
        .ok_or_else(|| parse_error(last + 1, "missing budget"))?;
    // wide enough for every budget and every negative number we clamp
    let budget: i128 = content.parse()
        .map_err(|_| parse_error(num, format!("budget '{}' is not an integer", content)))?;
    let budget = if budget < 0 {
        tracing::warn!(budget = %budget, line = num, "negative budget, using 0 instead");
        0
    } else {
        Budget::try_from(budget)
            .map_err(|_| parse_error(num, format!("budget '{}' is too large, at most {}", content, Budget::MAX)))?
    };

    if let Some((num, _)) = next_line()? {
        tracing::warn!(line = num, "ignoring trailing content after the budget");
    }

    Ok((agents.into(), budget))
}

pub fn read_network_file(path: &Path) -> Result<(Network, Budget)> {
    let file = File::open(path)?;
    read_network(BufReader::new(file))
}

/// Write a network in the format `read_network` understands.
pub fn write_network<W: Write>(writer: &mut W, network: &Network, budget: Budget) -> Result<()> {
    writeln!(writer, "{}", network.len())?;
    for a in network.agents() {
        writeln!(writer, "{},{}", a.opinion, a.receptivity)?;
    }
    writeln!(writer, "{}", budget)?;
    Ok(())
}

fn state(moderated: bool) -> &'static str {
    if moderated { "moderated" } else { "not moderated" }
}

pub fn write_report<W: Write>(writer: &mut W, outcome: &Outcome, format: Format) -> Result<()> {
    match format {
        Format::Text => write_text_report(writer, outcome),
        Format::Json => write_json(writer, outcome),
    }
}

fn write_text_report<W: Write>(writer: &mut W, outcome: &Outcome) -> Result<()> {
    writeln!(writer, "Algorithm: {}", outcome.algorithm)?;
    writeln!(writer, "Lowest extremism: {:.3}", outcome.extremism)?;
    writeln!(writer, "Effort used: {} of {}", outcome.effort, outcome.budget)?;
    writeln!(writer, "Strategy: {}", outcome.strategy)?;
    writeln!(writer)?;
    writeln!(writer, "Moderated agents and optimal strategy")?;
    writeln!(writer, "-------------------------------------")?;
    for (idx, a) in outcome.moderated.agents().iter().enumerate() {
        writeln!(
            writer,
            "Agent {}: opinion = {}, receptivity = {}, state = {}",
            idx, a.opinion, a.receptivity, state(outcome.strategy[idx])
        )?;
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Removes the temporary file when dropped, unless it was disarmed.
struct TmpGuard {
    path: PathBuf,
    armed: bool,
}

impl Drop for TmpGuard {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!(file = %self.path.display(), "could not remove temporary file: {}", e);
            }
        }
    }
}

/// A file which only appears at its final location once it is completely written.
///
/// Everything is written to a randomly named temporary file next to the
/// target, `finalize` moves it into place. If the `Output` is dropped
/// without `finalize`, e.g. because writing failed, the temporary file is removed.
pub struct Output {
    tmp_file: File,
    guard: TmpGuard,
    final_path: PathBuf,
}

impl Output {
    pub fn new(outname: &Path) -> Result<Output> {
        use rand::thread_rng;
        use rand::distributions::Alphanumeric;
        let random: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(10)
            .collect();

        let final_path = outname.to_path_buf();
        let dir = match final_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let tmp_path = dir.join(format!(".{}.tmp", random));
        let tmp_file = File::create(&tmp_path)?;

        Ok(Output {
            tmp_file,
            guard: TmpGuard { path: tmp_path, armed: true },
            final_path,
        })
    }

    pub fn file(&mut self) -> &mut File {
        &mut self.tmp_file
    }

    pub fn final_name(&self) -> &Path {
        &self.final_path
    }

    pub fn finalize(self) -> Result<()> {
        let Output { tmp_file, mut guard, final_path } = self;

        // flush and close temporary file, on any error the guard cleans up
        tmp_file.sync_all()?;
        drop(tmp_file);

        std::fs::rename(&guard.path, &final_path)?;
        guard.armed = false;

        Ok(())
    }
}
