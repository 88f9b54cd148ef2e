//! Bounded top-k selection.
//!
//! Keeps the k best candidates in a min-heap so the worst retained
//! candidate is evicted first. Higher score wins; on equal score the lower
//! insertion sequence wins.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Candidate<T> {
    score: f64,
    seq: u64,
    item: T,
}

impl<T> Candidate<T> {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialEq for Candidate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rank_cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Candidate<T> {}

impl<T> PartialOrd for Candidate<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Candidate<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank_cmp(other)
    }
}

/// Accumulator for the k best `(score, seq, item)` triples.
#[derive(Debug)]
pub struct TopK<T> {
    k: usize,
    heap: BinaryHeap<Reverse<Candidate<T>>>,
}

impl<T> TopK<T> {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.saturating_add(1).min(4096)),
        }
    }

    /// Offer a candidate. Returns whether it was retained.
    pub fn push(&mut self, score: f64, seq: u64, item: T) -> bool {
        if self.k == 0 {
            return false;
        }
        let candidate = Candidate { score, seq, item };
        if self.heap.len() < self.k {
            self.heap.push(Reverse(candidate));
            return true;
        }
        match self.heap.peek() {
            Some(Reverse(worst)) if candidate > *worst => {
                self.heap.pop();
                self.heap.push(Reverse(candidate));
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drain into `(score, item)` pairs, best first.
    pub fn into_sorted(self) -> Vec<(f64, T)> {
        // Ascending order of Reverse<_> is descending rank.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(c)| (c.score, c.item))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_best_k_descending() {
        let mut top = TopK::new(3);
        for (seq, score) in [0.1, 0.9, 0.5, 0.7, 0.3].into_iter().enumerate() {
            top.push(score, seq as u64, seq);
        }
        let out = top.into_sorted();
        let scores: Vec<f64> = out.iter().map(|(s, _)| *s).collect();
        assert_eq!(scores, vec![0.9, 0.7, 0.5]);
    }

    #[test]
    fn ties_prefer_earlier_insertion() {
        let mut top = TopK::new(2);
        top.push(0.5, 3, "c");
        top.push(0.5, 1, "a");
        top.push(0.5, 2, "b");
        let items: Vec<&str> = top.into_sorted().into_iter().map(|(_, i)| i).collect();
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn zero_k_retains_nothing() {
        let mut top = TopK::new(0);
        assert!(!top.push(1.0, 0, ()));
        assert!(top.is_empty());
    }
}
