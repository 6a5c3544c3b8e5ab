//! Postcard snapshots of the solver's transposition tables.
//!
//! Enumerating the state space dominates startup; a snapshot lets a binary
//! skip it. Loading a snapshot gives a solver whose lookups are identical to
//! a freshly built one.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::solver::Solver;
use crate::table::{Answer, StateKey, TranspositionTable};

/// Bumped whenever the key packing or the value semantics change.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub before: Vec<(StateKey, Answer)>,
    pub after: Vec<(StateKey, Answer)>,
}

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),
    #[error("unsupported snapshot version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

impl Snapshot {
    pub fn of(solver: &Solver) -> Self {
        Snapshot {
            version: SNAPSHOT_VERSION,
            before: solver.before_table().to_entries(),
            after: solver.after_table().to_entries(),
        }
    }

    pub fn into_solver(self) -> Result<Solver, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version { found: self.version, expected: SNAPSHOT_VERSION });
        }
        Ok(Solver::from_tables(
            TranspositionTable::from_entries(self.before),
            TranspositionTable::from_entries(self.after),
        ))
    }
}

pub fn to_postcard_bytes(snapshot: &Snapshot) -> Result<Vec<u8>, SnapshotError> {
    Ok(postcard::to_allocvec(snapshot)?)
}

pub fn from_postcard_bytes(bytes: &[u8]) -> Result<Snapshot, SnapshotError> {
    Ok(postcard::from_bytes(bytes)?)
}

/// Write the solver's tables to `path`.
pub fn write_snapshot(path: &Path, solver: &Solver) -> Result<(), SnapshotError> {
    let bytes = to_postcard_bytes(&Snapshot::of(solver))?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Rebuild a solver from a snapshot at `path`.
pub fn read_snapshot(path: &Path) -> Result<Solver, SnapshotError> {
    let bytes = fs::read(path)?;
    from_postcard_bytes(&bytes)?.into_solver()
}
