//! End-to-end mining scenarios over small, hand-checked corpora.

use stackmine_core::{
    Bundle, BundleParams, Item, SupportStats, build_bundles, count_support, item_set,
};

fn corpus(raw: &[&[&str]]) -> SupportStats {
    count_support(raw.iter().map(|doc| item_set(doc.iter())))
}

fn labels(bundles: &[Bundle]) -> Vec<Vec<String>> {
    bundles
        .iter()
        .map(|b| b.items().iter().map(ToString::to_string).collect())
        .collect()
}

#[test]
fn test_seed_without_closure_stays_a_pair() {
    let stats = corpus(&[&["a", "b", "c"], &["a", "b"], &["a", "b", "d"]]);

    assert_eq!(stats.pair_support(&Item::new("a"), &Item::new("b")), 3);
    assert_eq!(stats.pair_support(&Item::new("a"), &Item::new("c")), 1);
    assert_eq!(stats.pair_support(&Item::new("a"), &Item::new("d")), 1);

    let bundles = build_bundles(&stats, &BundleParams::new(2, 2, 50))
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(labels(&bundles), [["a", "b"]]);
}

#[test]
fn test_fully_connected_triple_yields_one_bundle() {
    let doc: &[&str] = &["x", "y", "z"];
    let stats = corpus(&[doc, doc, doc, doc]);

    let bundles = build_bundles(&stats, &BundleParams::new(3, 3, 50))
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(labels(&bundles), [["x", "y", "z"]]);
}

#[test]
fn test_cap_keeps_highest_support_seed() {
    let stats = corpus(&[
        &["c", "d"],
        &["c", "d"],
        &["c", "d"],
        &["a", "b"],
        &["a", "b"],
        &["a", "b"],
        &["a", "b"],
    ]);

    let capped = build_bundles(&stats, &BundleParams::new(2, 2, 1))
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(labels(&capped), [["a", "b"]]);

    let all = build_bundles(&stats, &BundleParams::new(2, 2, 10))
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(labels(&all), [["a", "b"], ["c", "d"]]);
}

#[test]
fn test_cap_tie_goes_to_lexicographically_first_seed() {
    let stats = corpus(&[&["y", "z"], &["y", "z"], &["a", "q"], &["a", "q"]]);

    let capped = build_bundles(&stats, &BundleParams::new(2, 2, 1))
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(labels(&capped), [["a", "q"]]);
}

#[test]
fn test_empty_corpus_is_not_an_error() {
    let stats = count_support(Vec::<Vec<Item>>::new());
    assert!(stats.singleton().is_empty());
    assert!(stats.pairs().is_empty());

    let bundles = build_bundles(&stats, &BundleParams::default());
    assert_eq!(bundles, Ok(Vec::new()));
}

#[test]
fn test_rejected_seeds_do_not_use_up_the_cap() {
    // {a,b} and {a,c} grow into the same triple; {p,q} must still be found
    // with top_k = 2.
    let stats = corpus(&[
        &["a", "b", "c"],
        &["a", "b", "c"],
        &["a", "b", "c"],
        &["a", "b", "c"],
        &["p", "q"],
        &["p", "q"],
    ]);

    let bundles = build_bundles(&stats, &BundleParams::new(2, 2, 2))
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        labels(&bundles),
        [vec!["a", "b", "c"], vec!["p", "q"]]
    );
}

#[test]
fn test_realistic_thread_corpus() {
    let stats = corpus(&[
        &["docker", "kubernetes", "helm", "aws"],
        &["docker", "kubernetes", "helm"],
        &["docker", "kubernetes", "terraform", "aws"],
        &["terraform", "aws", "ansible"],
        &["terraform", "aws", "ansible"],
        &["terraform", "aws", "docker"],
        &["python", "django", "postgres"],
        &["python", "django", "postgres", "docker"],
        &["python", "django", "postgres", "redis"],
        &["python", "fastapi"],
    ]);

    let bundles = build_bundles(&stats, &BundleParams::default())
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        labels(&bundles),
        [
            vec!["aws", "terraform"],
            vec!["aws", "docker"],
            vec!["django", "postgres", "python"],
            vec!["docker", "kubernetes"],
        ]
    );
}

#[test]
fn test_dedup_drops_bundle_at_exact_threshold() {
    // Both bundles share s1..s8; x and y never co-occur, so the y seeds grow
    // into a bundle with jaccard 8/10 against the x bundle.
    let shared = ["s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8"];
    let with = |extra: &'static str| -> Vec<&'static str> {
        shared.iter().copied().chain([extra]).collect()
    };
    let (x, y) = (with("x"), with("y"));
    let stats = corpus(&[&x[..], &x[..], &x[..], &y[..], &y[..]]);

    let at_threshold = build_bundles(&stats, &BundleParams::new(2, 2, 10))
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(labels(&at_threshold), [x.clone()]);

    let above = BundleParams {
        dedup_threshold: 0.81,
        ..BundleParams::new(2, 2, 10)
    };
    let bundles = build_bundles(&stats, &above)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(labels(&bundles), [x, y]);
    assert!((bundles[0].jaccard(&bundles[1]) - 0.8).abs() < f64::EPSILON);
}
