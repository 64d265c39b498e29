use rand::{rngs::SmallRng, SeedableRng};

/// A default seed for seeded runs.
pub const DEFAULT_SEED: u64 = 0x123456789abcdef;

/// The 64-bit fractional part of the golden ratio, used to space key derivations.
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// A domain tag separating a key's own draw stream from its children.
const DRAW_DOMAIN: u64 = 0x6a09_e667_f3bc_c908;

/// The SplitMix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// A deterministically splittable random key.
///
/// A key stands for one independent stream of randomness. Splitting a key
/// derives child keys as a pure function of the parent, so any two runs
/// seeded identically derive identical streams, with no global generator
/// involved. Child `i` depends only on the parent and `i`, never on how many
/// siblings were requested, which is what lets an ensemble be split once and
/// then regrouped freely.
///
/// A key should drive at most one state-advance call, through [`StreamKey::rng`].
/// Once split, the parent should not be fed to another advance call.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct StreamKey {
    word: u64,
}

impl StreamKey {
    /// Creates a root key from an integer seed.
    pub fn new(seed: u64) -> StreamKey {
        StreamKey {
            word: mix64(seed.wrapping_add(GOLDEN_GAMMA)),
        }
    }

    /// Derives `k` independent child keys, in a fixed order.
    ///
    /// Calling `split` twice with the same parent yields the same children,
    /// and the first `j` children of `split(k)` equal `split(j)` for `j <= k`.
    pub fn split(self, k: usize) -> Vec<StreamKey> {
        (1..=k as u64)
            .map(|i| StreamKey {
                word: mix64(self.word.wrapping_add(i.wrapping_mul(GOLDEN_GAMMA))),
            })
            .collect()
    }

    /// Materializes the key into a generator for one state-advance call.
    ///
    /// The seed derivation is domain-separated from [`StreamKey::split`], so a
    /// key's own draws never correlate with the draws of its children.
    pub fn rng(self) -> SmallRng {
        SmallRng::seed_from_u64(mix64(self.word ^ DRAW_DOMAIN))
    }
}
