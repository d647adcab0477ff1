use rand::seq::SliceRandom;
use tracing::debug;

use crate::rng::DeterministicRng;
use crate::types::{Position, PositionBatch, StreamName};

/// Lifecycle of a grouper's working order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GrouperState {
    /// The working order holds unread positions at `cursor..`.
    Filled,
    /// The working order cannot serve another full group and must be redrawn.
    NeedsReshuffle,
}

/// Turns one stream into an endless series of fixed-size shuffled groups.
///
/// Each window over the stream is an independent random permutation. When
/// fewer than `group_size` positions remain, the tail is discarded and a
/// fresh permutation is drawn, so groups are never short.
pub(crate) struct Grouper<'a> {
    name: StreamName,
    stream: &'a [Position],
    order: Vec<Position>,
    cursor: usize,
    group_size: usize,
    state: GrouperState,
    reshuffles: u64,
    rng: DeterministicRng,
}

impl<'a> Grouper<'a> {
    pub(crate) fn new(
        name: StreamName,
        stream: &'a [Position],
        group_size: usize,
        seed: u64,
    ) -> Self {
        let mut grouper = Self {
            name,
            stream,
            order: Vec::with_capacity(stream.len()),
            cursor: 0,
            group_size,
            state: GrouperState::NeedsReshuffle,
            reshuffles: 0,
            rng: DeterministicRng::new(seed),
        };
        grouper.refill();
        grouper
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> GrouperState {
        self.state
    }

    /// Number of permutations drawn after the initial one.
    pub(crate) fn reshuffles(&self) -> u64 {
        self.reshuffles
    }

    /// Next group of exactly `group_size` positions.
    ///
    /// Returns `None` only when the stream is shorter than one group.
    pub(crate) fn next_group(&mut self) -> Option<PositionBatch> {
        if self.group_size == 0 {
            return Some(Vec::new());
        }
        if self.cursor + self.group_size > self.order.len() {
            self.state = GrouperState::NeedsReshuffle;
        }
        if self.state == GrouperState::NeedsReshuffle {
            let dropped = self.order.len().saturating_sub(self.cursor);
            self.refill();
            self.reshuffles += 1;
            debug!(
                stream = self.name,
                dropped,
                reshuffles = self.reshuffles,
                "stream exhausted; drew a fresh permutation"
            );
        }
        let end = self.cursor + self.group_size;
        let group = self.order.get(self.cursor..end)?.to_vec();
        self.cursor = end;
        Some(group)
    }

    fn refill(&mut self) {
        self.order.clear();
        self.order.extend_from_slice(self.stream);
        self.order.shuffle(&mut self.rng);
        self.cursor = 0;
        self.state = GrouperState::Filled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn groups_are_never_short_and_tail_is_dropped() {
        let stream: Vec<Position> = (0..10).collect();
        let mut grouper = Grouper::new("unit", &stream, 3, 11);
        let mut first_window = HashSet::new();
        for _ in 0..3 {
            let group = grouper.next_group().unwrap();
            assert_eq!(group.len(), 3);
            first_window.extend(group);
        }
        // 9 distinct positions served from one permutation, one left over.
        assert_eq!(first_window.len(), 9);
        assert_eq!(grouper.reshuffles(), 0);

        let group = grouper.next_group().unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(grouper.reshuffles(), 1);
        assert_eq!(grouper.state(), GrouperState::Filled);
    }

    #[test]
    fn each_window_is_a_permutation_of_the_stream() {
        let stream: Vec<Position> = (100..112).collect();
        let mut grouper = Grouper::new("unit", &stream, 4, 3);
        for _ in 0..5 {
            let mut window = Vec::new();
            for _ in 0..3 {
                window.extend(grouper.next_group().unwrap());
            }
            window.sort_unstable();
            assert_eq!(window, stream);
        }
        assert_eq!(grouper.reshuffles(), 4);
    }

    #[test]
    fn windows_are_reshuffled_not_rotated() {
        let stream: Vec<Position> = (0..32).collect();
        let mut grouper = Grouper::new("unit", &stream, 32, 99);
        let windows: Vec<PositionBatch> = (0..4).map(|_| grouper.next_group().unwrap()).collect();
        let distinct: HashSet<&PositionBatch> = windows.iter().collect();
        assert_eq!(distinct.len(), windows.len());
    }

    #[test]
    fn zero_group_size_yields_empty_groups() {
        let mut grouper = Grouper::new("unit", &[], 0, 1);
        assert_eq!(grouper.next_group(), Some(Vec::new()));
        assert_eq!(grouper.reshuffles(), 0);
    }

    #[test]
    fn group_larger_than_stream_is_refused() {
        let stream = [1, 2];
        let mut grouper = Grouper::new("unit", &stream, 3, 1);
        assert_eq!(grouper.next_group(), None);
    }

    #[test]
    fn caller_stream_is_left_untouched() {
        let stream: Vec<Position> = (0..8).collect();
        let snapshot = stream.clone();
        let mut grouper = Grouper::new("unit", &stream, 2, 5);
        for _ in 0..10 {
            grouper.next_group();
        }
        assert_eq!(stream, snapshot);
    }
}
