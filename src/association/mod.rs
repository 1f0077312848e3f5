//! # Reco-to-truth association
//!
//! The simulation chain ships an association table per event: two parallel index
//! columns where entry `i` links reconstructed particle `reco_index[i]` to truth
//! particle `truth_index[i]`. [`AssociationIndex`] reduces that table to a lookup
//! map where the **last** pair for a given reconstructed index wins, matching the
//! overwrite semantics of a plain map insert. Later entries silently replace
//! earlier ones; this ordering dependence is part of the contract.
//!
//! ## Example
//!
//! ```
//! use resoscan::association::{AssociationIndex, AssociationTable};
//!
//! let table = AssociationTable::new(vec![0, 1, 0], vec![5, 6, 7])?;
//! let index = AssociationIndex::build(&table);
//! assert_eq!(index.get(0), Some(7));
//! assert_eq!(index.get(1), Some(6));
//! assert_eq!(index.get(2), None);
//! # Ok::<(), resoscan::association::AssociationError>(())
//! ```

use std::collections::HashMap;


/// Errors raised while building association tables.
///
/// These are upstream contract violations and are never downgraded to sentinels.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssociationError {
    /// The two index columns have different lengths
    #[error("Association length mismatch: reco index has {reco_len} entries, truth index has {truth_len} entries")]
    LengthMismatch {
        /// Length of the reconstructed-index column
        reco_len: usize,
        /// Length of the truth-index column
        truth_len: usize,
    },
}

/// Raw per-event association table as two parallel index columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationTable {
    reco_index: Vec<i32>,
    truth_index: Vec<i32>,
}

impl AssociationTable {
    /// Create a table, rejecting columns of unequal length.
    pub fn new(reco_index: Vec<i32>, truth_index: Vec<i32>) -> Result<Self, AssociationError> {
        if reco_index.len() != truth_index.len() {
            return Err(AssociationError::LengthMismatch {
                reco_len: reco_index.len(),
                truth_len: truth_index.len(),
            });
        }
        Ok(Self {
            reco_index,
            truth_index,
        })
    }

    /// Reconstructed-collection indices
    pub fn reco_index(&self) -> &[i32] {
        &self.reco_index
    }

    /// Truth-collection indices
    pub fn truth_index(&self) -> &[i32] {
        &self.truth_index
    }

    /// Number of association pairs
    pub fn len(&self) -> usize {
        self.reco_index.len()
    }

    /// Whether the table has no pairs
    pub fn is_empty(&self) -> bool {
        self.reco_index.is_empty()
    }

    /// Iterate `(reco, truth)` pairs in table order.
    pub fn pairs(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.reco_index
            .iter()
            .copied()
            .zip(self.truth_index.iter().copied())
    }
}

/// Lookup from reconstructed-collection index to truth-collection index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationIndex {
    map: HashMap<i32, i32>,
}

impl AssociationIndex {
    /// Build the index from a validated table, last pair wins.
    pub fn build(table: &AssociationTable) -> Self {
        let mut map = HashMap::with_capacity(table.len());
        for (reco, truth) in table.pairs() {
            map.insert(reco, truth);
        }
        Self { map }
    }

    /// Build directly from two index slices.
    ///
    /// Fails immediately when the slices differ in length.
    pub fn from_columns(reco_index: &[i32], truth_index: &[i32]) -> Result<Self, AssociationError> {
        if reco_index.len() != truth_index.len() {
            return Err(AssociationError::LengthMismatch {
                reco_len: reco_index.len(),
                truth_len: truth_index.len(),
            });
        }
        let mut map = HashMap::with_capacity(reco_index.len());
        for (&reco, &truth) in reco_index.iter().zip(truth_index) {
            map.insert(reco, truth);
        }
        Ok(Self { map })
    }

    /// Truth index associated with `reco`, if any pair mentioned it.
    #[inline]
    pub fn get(&self, reco: i32) -> Option<i32> {
        self.map.get(&reco).copied()
    }

    /// Number of distinct reconstructed indices with a match
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no reconstructed index has a match
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate `(reco, truth)` entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.map.iter().map(|(&reco, &truth)| (reco, truth))
    }
}
