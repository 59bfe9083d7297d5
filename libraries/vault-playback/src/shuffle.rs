//! Queue randomization
//!
//! Fisher-Yates over an injectable RNG, so tests can use a seeded generator.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle a slice in place using Fisher-Yates
///
/// `SliceRandom::shuffle` walks `i` from the last position down to 1, draws
/// `j` uniformly from `0..=i` and swaps positions `i` and `j`. Every
/// permutation is equally likely.
pub fn fisher_yates<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    items.shuffle(rng);
}

/// Return a shuffled copy, leaving the input untouched
pub fn shuffled<T, R>(items: &[T], rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let mut copy = items.to_vec();
    fisher_yates(&mut copy, rng);
    copy
}
