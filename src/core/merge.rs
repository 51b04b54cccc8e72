//! Merging of per-unit bin accumulations
//!
//! Every unit of work (one chromosome of one file) produces its own
//! [`LagBins`]. They are folded into a single accumulation position by
//! position, and each source is dropped as soon as it has been absorbed.

use crate::core::binner::LagBins;
use crate::core::error::{MergeConsistencyError, MergeResult};
use crate::core::lags::LagBinSet;

impl LagBins {
    /// Append the pairs of `other` bin by bin, consuming it.
    ///
    /// Both sets must have been built against the same [`LagBinSet`].
    pub fn absorb(&mut self, other: LagBins) -> MergeResult<()> {
        if self.bins.len() != other.bins.len() {
            return Err(MergeConsistencyError::BinCountMismatch {
                expected: self.bins.len(),
                found: other.bins.len(),
            });
        }
        for (index, (ours, theirs)) in self.bins.iter().zip(&other.bins).enumerate() {
            if ours.key() != theirs.key() {
                return Err(MergeConsistencyError::BinKeyMismatch {
                    index,
                    expected: ours.key(),
                    found: theirs.key(),
                });
            }
        }

        self.pairs_binned += other.pairs_binned;
        self.pairs_unbinned += other.pairs_unbinned;
        for (ours, theirs) in self.bins.iter_mut().zip(other.bins) {
            if ours.xs.is_empty() {
                // take the buffers as-is instead of copying
                ours.xs = theirs.xs;
                ours.ys = theirs.ys;
            } else {
                ours.xs.extend(theirs.xs);
                ours.ys.extend(theirs.ys);
            }
        }
        Ok(())
    }
}

/// Fold unit results, in the given order, into one accumulation set
pub fn merge_bins<I>(lags: &LagBinSet, sources: I) -> MergeResult<LagBins>
where
    I: IntoIterator<Item = LagBins>,
{
    let mut merged = LagBins::empty(lags);
    for source in sources {
        merged.absorb(source)?;
    }
    Ok(merged)
}
