//! Singleton and pair support counting.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::{MineError, Result};
use crate::item::{Item, ItemPair};

/// Number of documents containing each item.
pub type SingletonSupport = HashMap<Item, u32>;

/// Number of documents containing both items of each pair.
pub type PairSupport = HashMap<ItemPair, u32>;

/// Support statistics for one mining run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportStats {
    singleton: SingletonSupport,
    pairs: PairSupport,
    documents: usize,
}

impl SupportStats {
    /// Wrap maps that were counted elsewhere.
    ///
    /// Nothing is checked here; [`SupportStats::validate`] (called by
    /// `build_bundles`) rejects inconsistent maps.
    #[must_use]
    pub const fn from_parts(singleton: SingletonSupport, pairs: PairSupport) -> Self {
        Self {
            singleton,
            pairs,
            documents: 0,
        }
    }

    #[must_use]
    pub const fn singleton(&self) -> &SingletonSupport {
        &self.singleton
    }

    #[must_use]
    pub const fn pairs(&self) -> &PairSupport {
        &self.pairs
    }

    /// Documents counted, including those without items. Zero for maps
    /// built with [`SupportStats::from_parts`].
    #[must_use]
    pub const fn documents(&self) -> usize {
        self.documents
    }

    #[must_use]
    pub fn support(&self, item: &Item) -> u32 {
        self.singleton.get(item).copied().unwrap_or(0)
    }

    /// Pair support for `a` and `b` in either order; zero when they never
    /// co-occur or are the same item.
    #[must_use]
    pub fn pair_support(&self, a: &Item, b: &Item) -> u32 {
        ItemPair::new(a.clone(), b.clone())
            .and_then(|pair| self.pairs.get(&pair).copied())
            .unwrap_or(0)
    }

    /// Items by descending support, ties broken by ascending label.
    #[must_use]
    pub fn ranked_items(&self) -> Vec<(&Item, u32)> {
        let mut ranked: Vec<(&Item, u32)> = self
            .singleton
            .iter()
            .map(|(item, &count)| (item, count))
            .collect();
        ranked.sort_by(|(a, ca), (b, cb)| cb.cmp(ca).then_with(|| a.cmp(b)));
        ranked
    }

    /// Pairs with support of at least `min_pair`, by descending support,
    /// ties broken by ascending `(low, high)`.
    #[must_use]
    pub fn ranked_pairs(&self, min_pair: u32) -> Vec<(&ItemPair, u32)> {
        let mut ranked: Vec<(&ItemPair, u32)> = self
            .pairs
            .iter()
            .filter(|&(_, &count)| count >= min_pair)
            .map(|(pair, &count)| (pair, count))
            .collect();
        ranked.sort_by(|(a, ca), (b, cb)| cb.cmp(ca).then_with(|| a.cmp(b)));
        ranked
    }

    /// Check that the pair map is consistent with the singleton map.
    ///
    /// Every pair member must be a known item with non-zero support, and no
    /// pair may be supported by more documents than either of its members.
    pub fn validate(&self) -> Result<()> {
        if let Some((item, _)) = self.singleton.iter().find(|&(_, &count)| count == 0) {
            return Err(MineError::InvalidInput(format!(
                "item '{item}' has zero support"
            )));
        }

        for (pair, &count) in &self.pairs {
            for member in [pair.low(), pair.high()] {
                let Some(&support) = self.singleton.get(member) else {
                    return Err(MineError::InvalidInput(format!(
                        "pair {pair} references unknown item '{member}'"
                    )));
                };
                if count > support {
                    return Err(MineError::InvalidInput(format!(
                        "pair {pair} has support {count} above '{member}' support {support}"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Count singleton and pair support over a sequence of documents.
///
/// Each document is deduplicated first, so repeating an item inside one
/// document adds at most one to any count. Documents with fewer than two
/// distinct items add no pair counts.
pub fn count_support<D, I>(documents: D) -> SupportStats
where
    D: IntoIterator<Item = I>,
    I: IntoIterator<Item = Item>,
{
    let mut stats = SupportStats::default();

    for document in documents {
        let distinct: Vec<Item> = document
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        stats.documents += 1;

        for item in &distinct {
            *stats.singleton.entry(item.clone()).or_insert(0) += 1;
        }

        // `distinct` is sorted, so (i, j) with i < j is already canonical.
        for (i, low) in distinct.iter().enumerate() {
            for high in &distinct[i + 1..] {
                if let Some(pair) = ItemPair::new(low.clone(), high.clone()) {
                    *stats.pairs.entry(pair).or_insert(0) += 1;
                }
            }
        }
    }

    debug!(
        "Counted support over {} documents: {} items, {} pairs",
        stats.documents,
        stats.singleton.len(),
        stats.pairs.len()
    );

    stats
}
