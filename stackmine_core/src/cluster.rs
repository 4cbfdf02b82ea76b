//! Greedy bundle clustering over support statistics.
//!
//! Seeds are the pairs with support of at least `min_pair`, taken in
//! descending support order. Each seed grows in a single pass over all items
//! (descending support): an item joins only if it co-occurs at least
//! `min_pair` times with every current member. Items skipped early are not
//! revisited once the bundle has grown, so a larger valid bundle can be
//! missed; the scan stays linear per seed.
//!
//! Grown bundles are then gated on `min_support` for every member and
//! dropped when their Jaccard similarity with an already accepted bundle
//! reaches `dedup_threshold`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, trace};

use crate::error::{MineError, Result};
use crate::item::Item;
use crate::support::SupportStats;
use crate::util::content_hash;

/// Parameters for one clustering run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BundleParams {
    /// Minimum singleton support for every bundle member.
    #[serde(default = "BundleParams::default_min_support")]
    pub min_support: u32,
    /// Minimum pair support between every two bundle members.
    #[serde(default = "BundleParams::default_min_pair")]
    pub min_pair: u32,
    /// Maximum number of bundles returned.
    #[serde(default = "BundleParams::default_top_k")]
    pub top_k: usize,
    /// Jaccard similarity at which a new bundle counts as a duplicate.
    #[serde(default = "BundleParams::default_dedup_threshold")]
    pub dedup_threshold: f64,
}

impl BundleParams {
    const fn default_min_support() -> u32 {
        3
    }

    const fn default_min_pair() -> u32 {
        3
    }

    const fn default_top_k() -> usize {
        50
    }

    const fn default_dedup_threshold() -> f64 {
        0.8
    }

    #[must_use]
    pub fn new(min_support: u32, min_pair: u32, top_k: usize) -> Self {
        Self {
            min_support,
            min_pair,
            top_k,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_support == 0 {
            return Err(MineError::InvalidParams("min_support must be at least 1".into()));
        }
        if self.min_pair == 0 {
            return Err(MineError::InvalidParams("min_pair must be at least 1".into()));
        }
        if self.top_k == 0 {
            return Err(MineError::InvalidParams("top_k must be at least 1".into()));
        }
        if !(self.dedup_threshold > 0.0 && self.dedup_threshold <= 1.0) {
            return Err(MineError::InvalidParams(format!(
                "dedup_threshold must be in (0, 1], got {}",
                self.dedup_threshold
            )));
        }
        Ok(())
    }
}

impl Default for BundleParams {
    fn default() -> Self {
        Self {
            min_support: Self::default_min_support(),
            min_pair: Self::default_min_pair(),
            top_k: Self::default_top_k(),
            dedup_threshold: Self::default_dedup_threshold(),
        }
    }
}

/// An accepted bundle: a sorted, duplicate-free list of items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Item>", into = "Vec<Item>")]
pub struct Bundle {
    items: Vec<Item>,
}

impl Bundle {
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stable identifier derived from the member list.
    #[must_use]
    pub fn id(&self) -> String {
        let joined = self
            .items
            .iter()
            .map(Item::as_str)
            .collect::<Vec<_>>()
            .join(",");
        content_hash("bundle", &joined)
    }

    /// Intersection size over union size; two empty bundles score 0.
    #[must_use]
    pub fn jaccard(&self, other: &Self) -> f64 {
        let a: BTreeSet<&Item> = self.items.iter().collect();
        let b: BTreeSet<&Item> = other.items.iter().collect();
        jaccard(&a, &b)
    }
}

impl From<BTreeSet<Item>> for Bundle {
    fn from(set: BTreeSet<Item>) -> Self {
        Self {
            items: set.into_iter().collect(),
        }
    }
}

impl TryFrom<Vec<Item>> for Bundle {
    type Error = MineError;

    fn try_from(items: Vec<Item>) -> Result<Self> {
        let total = items.len();
        let set: BTreeSet<Item> = items.into_iter().collect();
        if set.len() != total {
            return Err(MineError::InvalidInput(
                "bundle contains duplicate items".into(),
            ));
        }
        Ok(Self::from(set))
    }
}

impl From<Bundle> for Vec<Item> {
    fn from(bundle: Bundle) -> Self {
        bundle.items
    }
}

/// Jaccard similarity of two sets; 0 when both are empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Grow, gate and deduplicate bundles from support statistics.
///
/// Stops once `top_k` bundles are accepted; seeds rejected by the support
/// gate or as duplicates do not count toward the cap. The output order is
/// the order in which seeds were processed.
pub fn build_bundles(stats: &SupportStats, params: &BundleParams) -> Result<Vec<Bundle>> {
    params.validate()?;
    stats.validate()?;

    let seeds = stats.ranked_pairs(params.min_pair);
    let candidates = stats.ranked_items();

    let mut accepted: Vec<BTreeSet<Item>> = Vec::new();
    let mut bundles: Vec<Bundle> = Vec::new();
    let mut under_supported = 0_usize;
    let mut duplicates = 0_usize;

    for (seed, count) in &seeds {
        if bundles.len() >= params.top_k {
            break;
        }

        let mut bundle: BTreeSet<Item> = BTreeSet::new();
        bundle.insert(seed.low().clone());
        bundle.insert(seed.high().clone());

        for &(candidate, _) in &candidates {
            if bundle.contains(candidate) {
                continue;
            }
            let closed = bundle
                .iter()
                .all(|member| stats.pair_support(candidate, member) >= params.min_pair);
            if closed {
                trace!("Seed {seed}: admitted '{candidate}'");
                bundle.insert(candidate.clone());
            }
        }

        if let Some(weak) = bundle
            .iter()
            .find(|item| stats.support(item) < params.min_support)
        {
            debug!("Seed {seed} (support {count}): dropped, '{weak}' below min_support");
            under_supported += 1;
            continue;
        }

        if let Some(similarity) = accepted
            .iter()
            .map(|seen| jaccard(&bundle, seen))
            .find(|&similarity| similarity >= params.dedup_threshold)
        {
            debug!(
                "Seed {seed} (support {count}): dropped as duplicate (jaccard {similarity:.2})"
            );
            duplicates += 1;
            continue;
        }

        debug!(
            "Seed {seed} (support {count}): accepted bundle of {} items",
            bundle.len()
        );
        bundles.push(Bundle::from(bundle.clone()));
        accepted.push(bundle);
    }

    info!(
        "Clustered {} seeds into {} bundles ({} under-supported, {} duplicates)",
        seeds.len(),
        bundles.len(),
        under_supported,
        duplicates
    );

    Ok(bundles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::count_support;

    fn docs(raw: &[&[&str]]) -> Vec<Vec<Item>> {
        raw.iter()
            .map(|d| d.iter().map(|s| Item::new(s)).collect())
            .collect()
    }

    fn labels(bundles: &[Bundle]) -> Vec<Vec<&str>> {
        bundles
            .iter()
            .map(|b| b.items().iter().map(Item::as_str).collect())
            .collect()
    }

    #[test]
    fn default_params_match_documented_values() {
        let params = BundleParams::default();
        assert_eq!(params.min_support, 3);
        assert_eq!(params.min_pair, 3);
        assert_eq!(params.top_k, 50);
        assert!((params.dedup_threshold - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_zero_params() {
        let stats = SupportStats::default();
        for params in [
            BundleParams::new(0, 1, 1),
            BundleParams::new(1, 0, 1),
            BundleParams::new(1, 1, 0),
        ] {
            assert!(matches!(
                build_bundles(&stats, &params),
                Err(MineError::InvalidParams(_))
            ));
        }
        let params = BundleParams {
            dedup_threshold: 1.5,
            ..BundleParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn growth_requires_every_member() {
        // c co-occurs with a often but rarely with b.
        let stats = count_support(docs(&[
            &["a", "b", "c"],
            &["a", "b"],
            &["a", "b"],
            &["a", "c"],
            &["a", "c"],
        ]));
        let bundles = build_bundles(&stats, &BundleParams::new(1, 2, 10))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(labels(&bundles), [vec!["a", "b"], vec!["a", "c"]]);
    }

    #[test]
    fn earlier_admissions_constrain_later_candidates() {
        // From seed {a, b}, c (support 3) is admitted before d (support 2);
        // d never co-occurs with c, so it only appears via the {a, d} seed.
        let stats = count_support(docs(&[
            &["a", "b", "c"],
            &["a", "b", "c"],
            &["a", "b", "c"],
            &["a", "b", "d"],
            &["a", "b", "d"],
        ]));
        let bundles = build_bundles(&stats, &BundleParams::new(1, 2, 10))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(labels(&bundles), [vec!["a", "b", "c"], vec!["a", "b", "d"]]);
    }

    #[test]
    fn under_supported_seed_is_dropped() {
        let stats = count_support(docs(&[&["a", "b"], &["a", "b"], &["a"]]));
        assert_eq!(build_bundles(&stats, &BundleParams::new(3, 2, 10)), Ok(Vec::new()));
    }

    #[test]
    fn support_gate_applies_to_grown_members() {
        // {a, b} alone passes min_support 3, but growth admits c (support 2)
        // first, and the gate then drops the whole grown bundle.
        let stats = count_support(docs(&[&["a", "b", "c"], &["a", "b", "c"], &["a", "b"]]));
        assert_eq!(stats.support(&Item::new("c")), 2);
        assert_eq!(build_bundles(&stats, &BundleParams::new(3, 2, 10)), Ok(Vec::new()));

        // Without c passing the pair threshold the seed stays {a, b}.
        let bundles = build_bundles(&stats, &BundleParams::new(3, 3, 10))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(labels(&bundles), [vec!["a", "b"]]);
    }

    #[test]
    fn near_duplicates_are_dropped() {
        // Seeds {a,b}, {a,c}, {b,c} all grow into {a,b,c}.
        let stats = count_support(docs(&[&["a", "b", "c"], &["a", "b", "c"], &["a", "b", "c"]]));
        let bundles = build_bundles(&stats, &BundleParams::new(3, 3, 10))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(labels(&bundles), [vec!["a", "b", "c"]]);
    }

    #[test]
    fn threshold_controls_dedup() {
        // {a,b,c} vs {a,b,d}: jaccard 0.5.
        let stats = count_support(docs(&[
            &["a", "b", "c"],
            &["a", "b", "c"],
            &["a", "b", "d"],
            &["a", "b", "d"],
        ]));
        let strict = BundleParams {
            dedup_threshold: 0.5,
            ..BundleParams::new(1, 2, 10)
        };
        let loose = BundleParams::new(1, 2, 10);

        let strict_bundles = build_bundles(&stats, &strict)
            .unwrap_or_else(|e| panic!("{e}"));
        let loose_bundles = build_bundles(&stats, &loose)
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(strict_bundles.len() < loose_bundles.len());
    }

    #[test]
    fn invalid_stats_fail_fast() {
        let mut singleton = crate::support::SingletonSupport::new();
        singleton.insert(Item::new("a"), 0);
        let stats = SupportStats::from_parts(singleton, crate::support::PairSupport::new());
        assert!(matches!(
            build_bundles(&stats, &BundleParams::default()),
            Err(MineError::InvalidInput(_))
        ));
    }

    #[test]
    fn jaccard_of_sets() {
        let a: BTreeSet<u8> = [1, 2, 3, 4].into_iter().collect();
        let b: BTreeSet<u8> = [2, 3, 4, 5].into_iter().collect();
        assert!((jaccard(&a, &b) - 0.6).abs() < 1e-9);
        assert!(jaccard(&BTreeSet::<u8>::new(), &BTreeSet::new()).abs() < f64::EPSILON);
    }

    #[test]
    fn bundle_is_sorted_and_rejects_duplicates_when_deserialized() {
        let bundle: Bundle =
            serde_json::from_str(r#"["b", "a"]"#).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(labels(&[bundle]), [vec!["a", "b"]]);

        let dup: std::result::Result<Bundle, _> = serde_json::from_str(r#"["a", "A"]"#);
        assert!(dup.is_err());
    }

    #[test]
    fn bundle_id_is_stable() {
        let a = Bundle::from(BTreeSet::from([Item::new("x"), Item::new("y")]));
        let b = Bundle::from(BTreeSet::from([Item::new("y"), Item::new("x")]));
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id().len(), 64);
    }
}
