use rand::Rng;
use rustc_hash::FxHashSet;

use crate::{StreamKey, DEFAULT_SEED};

/// Splitting is a pure function: the same parent and count always derive the
/// same children.
#[test]
fn split_is_deterministic() {
    let key = StreamKey::new(DEFAULT_SEED);
    assert_eq!(key.split(100), key.split(100));
}

/// Child `i` does not depend on how many siblings were requested, so an
/// ensemble can be split once and regrouped freely.
#[test]
fn split_prefixes_agree() {
    let key = StreamKey::new(DEFAULT_SEED);
    let long = key.split(100);
    let short = key.split(7);
    assert_eq!(&long[..7], &short[..]);
}

#[test]
fn children_are_distinct() {
    let key = StreamKey::new(DEFAULT_SEED);
    let children = key.split(1 << 12);
    let unique: FxHashSet<StreamKey> = children.iter().copied().collect();
    assert_eq!(unique.len(), children.len());
}

/// Children of different parents do not collide either.
#[test]
fn grandchildren_are_distinct() {
    let key = StreamKey::new(DEFAULT_SEED);
    let mut seen = FxHashSet::default();
    for child in key.split(64) {
        for grandchild in child.split(64) {
            assert!(seen.insert(grandchild));
        }
    }
}

/// The generator materialized from a key is itself deterministic.
#[test]
fn rng_is_deterministic() {
    let key = StreamKey::new(42);
    let draws: Vec<u64> = (0..8).map(|_| key.rng().random()).collect();
    assert!(draws.windows(2).all(|pair| pair[0] == pair[1]));

    let mut a = key.rng();
    let mut b = key.rng();
    for _ in 0..100 {
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }
}

/// A key's own draw stream is separated from its children's.
#[test]
fn draws_do_not_collide_with_children() {
    let key = StreamKey::new(DEFAULT_SEED);
    let children = key.split(4);
    let mut parent_rng = key.rng();
    for child in children {
        assert_ne!(parent_rng.random::<u64>(), child.rng().random::<u64>());
    }
}

/// Different seeds give different root keys.
#[test]
fn seeds_differ() {
    assert_ne!(StreamKey::new(0), StreamKey::new(1));
    assert_ne!(StreamKey::new(DEFAULT_SEED), StreamKey::new(DEFAULT_SEED + 1));
}
