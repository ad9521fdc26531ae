//! Matchmaker: FIFO wait pool plus symmetric pairing map.
//!
//! Pure state machine. It decides who waits and who gets paired; turning
//! those decisions into outbound messages is the lobby's job.

use std::collections::{HashMap, HashSet, VecDeque};

use pairline_core::ConnId;

/// Result of a match request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The caller already has a partner; nothing changed.
    AlreadyPaired,
    /// No eligible candidate; the caller was appended to the wait pool.
    Waiting,
    /// The caller was paired with `waiting_peer`, the oldest eligible waiter.
    Paired { waiting_peer: ConnId },
}

/// Result of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// A pairing was torn down; `partner` survives.
    Unpaired { partner: ConnId },
    /// The caller was removed from the wait pool.
    Dequeued,
    /// The caller was neither waiting nor paired.
    Idle,
}

#[derive(Debug, Default)]
pub struct Matchmaker {
    wait_pool: VecDeque<ConnId>,
    pairs: HashMap<ConnId, ConnId>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair `conn` with the oldest live waiter not in `excluded`, or queue it.
    ///
    /// Entries for which `is_live` returns false are stale and dropped from
    /// the pool as the scan meets them.
    pub fn request_match<F>(&mut self, conn: ConnId, excluded: &HashSet<ConnId>, is_live: F) -> MatchOutcome
    where
        F: Fn(&ConnId) -> bool,
    {
        if self.pairs.contains_key(&conn) {
            return MatchOutcome::AlreadyPaired;
        }

        // A repeated join while waiting is re-evaluated, never duplicated.
        self.wait_pool.retain(|id| *id != conn);
        self.wait_pool.retain(|id| is_live(id));

        let candidate = self
            .wait_pool
            .iter()
            .position(|id| !excluded.contains(id))
            .and_then(|i| self.wait_pool.remove(i));

        match candidate {
            Some(waiting_peer) => {
                self.pairs.insert(conn, waiting_peer);
                self.pairs.insert(waiting_peer, conn);
                MatchOutcome::Paired { waiting_peer }
            }
            None => {
                self.wait_pool.push_back(conn);
                MatchOutcome::Waiting
            }
        }
    }

    /// Take `conn` out of both the pairing map and the wait pool. Idempotent.
    pub fn release(&mut self, conn: ConnId) -> ReleaseOutcome {
        if let Some(partner) = self.pairs.remove(&conn) {
            self.pairs.remove(&partner);
            return ReleaseOutcome::Unpaired { partner };
        }

        let before = self.wait_pool.len();
        self.wait_pool.retain(|id| *id != conn);
        if self.wait_pool.len() < before {
            ReleaseOutcome::Dequeued
        } else {
            ReleaseOutcome::Idle
        }
    }

    pub fn partner_of(&self, conn: &ConnId) -> Option<ConnId> {
        self.pairs.get(conn).copied()
    }

    pub fn is_waiting(&self, conn: &ConnId) -> bool {
        self.wait_pool.contains(conn)
    }

    /// Waiting ids, oldest first.
    pub fn waiting(&self) -> impl Iterator<Item = &ConnId> {
        self.wait_pool.iter()
    }

    pub fn waiting_len(&self) -> usize {
        self.wait_pool.len()
    }

    /// Number of active pairings (each counts once).
    pub fn pair_count(&self) -> usize {
        self.pairs.len() / 2
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut seen = HashSet::new();
        for id in &self.wait_pool {
            assert!(seen.insert(*id), "{id} queued twice");
            assert!(!self.pairs.contains_key(id), "{id} both waiting and paired");
        }
        for (a, b) in &self.pairs {
            assert_ne!(a, b, "{a} paired with itself");
            assert_eq!(self.pairs.get(b), Some(a), "pairing {a} -> {b} is not symmetric");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<ConnId> {
        (0..n).map(|_| ConnId::new()).collect()
    }

    fn all_live(_: &ConnId) -> bool {
        true
    }

    #[test]
    fn first_join_waits_second_pairs() {
        let mut mm = Matchmaker::new();
        let c = ids(2);
        let none = HashSet::new();

        assert_eq!(mm.request_match(c[0], &none, all_live), MatchOutcome::Waiting);
        assert!(mm.is_waiting(&c[0]));
        assert_eq!(
            mm.request_match(c[1], &none, all_live),
            MatchOutcome::Paired { waiting_peer: c[0] }
        );
        assert_eq!(mm.partner_of(&c[0]), Some(c[1]));
        assert_eq!(mm.partner_of(&c[1]), Some(c[0]));
        assert_eq!(mm.waiting_len(), 0);
        assert_eq!(mm.pair_count(), 1);
        mm.assert_invariants();
    }

    #[test]
    fn oldest_waiter_wins() {
        let mut mm = Matchmaker::new();
        let c = ids(4);
        let none = HashSet::new();

        // C1..C3 can't see each other, so all three queue up.
        let excluded: HashSet<ConnId> = c[..3].iter().copied().collect();
        for id in &c[..3] {
            assert_eq!(mm.request_match(*id, &excluded, all_live), MatchOutcome::Waiting);
        }
        assert_eq!(mm.waiting().copied().collect::<Vec<_>>(), c[..3].to_vec());

        assert_eq!(
            mm.request_match(c[3], &none, all_live),
            MatchOutcome::Paired { waiting_peer: c[0] }
        );
        assert_eq!(mm.waiting().copied().collect::<Vec<_>>(), vec![c[1], c[2]]);
        mm.assert_invariants();
    }

    #[test]
    fn duplicate_join_while_paired_is_noop() {
        let mut mm = Matchmaker::new();
        let c = ids(2);
        let none = HashSet::new();
        mm.request_match(c[0], &none, all_live);
        mm.request_match(c[1], &none, all_live);

        assert_eq!(mm.request_match(c[0], &none, all_live), MatchOutcome::AlreadyPaired);
        assert_eq!(mm.request_match(c[1], &none, all_live), MatchOutcome::AlreadyPaired);
        assert_eq!(mm.partner_of(&c[0]), Some(c[1]));
        mm.assert_invariants();
    }

    #[test]
    fn duplicate_join_while_waiting_never_self_pairs() {
        let mut mm = Matchmaker::new();
        let a = ConnId::new();
        let none = HashSet::new();
        assert_eq!(mm.request_match(a, &none, all_live), MatchOutcome::Waiting);
        assert_eq!(mm.request_match(a, &none, all_live), MatchOutcome::Waiting);
        assert_eq!(mm.waiting_len(), 1);
        mm.assert_invariants();
    }

    #[test]
    fn stale_waiters_are_skipped_and_purged() {
        let mut mm = Matchmaker::new();
        let c = ids(3);
        let none = HashSet::new();
        let excluded: HashSet<ConnId> = c[..2].iter().copied().collect();
        mm.request_match(c[0], &excluded, all_live);
        mm.request_match(c[1], &excluded, all_live);

        let dead = c[0];
        let outcome = mm.request_match(c[2], &none, |id| *id != dead);
        assert_eq!(outcome, MatchOutcome::Paired { waiting_peer: c[1] });
        assert_eq!(mm.waiting_len(), 0);
        mm.assert_invariants();
    }

    #[test]
    fn excluded_candidates_are_passed_over() {
        let mut mm = Matchmaker::new();
        let c = ids(3);
        let first_two: HashSet<ConnId> = c[..2].iter().copied().collect();
        mm.request_match(c[0], &first_two, all_live);
        mm.request_match(c[1], &first_two, all_live);

        let excluded = HashSet::from([c[0]]);
        assert_eq!(
            mm.request_match(c[2], &excluded, all_live),
            MatchOutcome::Paired { waiting_peer: c[1] }
        );
        assert!(mm.is_waiting(&c[0]));

        let only = HashSet::from([c[0]]);
        let d = ConnId::new();
        assert_eq!(mm.request_match(d, &only, all_live), MatchOutcome::Waiting);
        assert_eq!(mm.waiting().copied().collect::<Vec<_>>(), vec![c[0], d]);
        mm.assert_invariants();
    }

    #[test]
    fn release_tears_down_both_sides_once() {
        let mut mm = Matchmaker::new();
        let c = ids(2);
        let none = HashSet::new();
        mm.request_match(c[0], &none, all_live);
        mm.request_match(c[1], &none, all_live);

        assert_eq!(mm.release(c[0]), ReleaseOutcome::Unpaired { partner: c[1] });
        assert_eq!(mm.partner_of(&c[1]), None);
        assert!(!mm.is_waiting(&c[1]));
        assert_eq!(mm.release(c[0]), ReleaseOutcome::Idle);
        assert_eq!(mm.release(c[1]), ReleaseOutcome::Idle);
        mm.assert_invariants();
    }

    #[test]
    fn release_dequeues_waiter() {
        let mut mm = Matchmaker::new();
        let a = ConnId::new();
        mm.request_match(a, &HashSet::new(), all_live);
        assert_eq!(mm.release(a), ReleaseOutcome::Dequeued);
        assert_eq!(mm.waiting_len(), 0);
        assert_eq!(mm.release(a), ReleaseOutcome::Idle);
    }

    #[test]
    fn invariants_hold_under_churn() {
        let mut mm = Matchmaker::new();
        let c = ids(12);
        let none = HashSet::new();
        for (i, id) in c.iter().enumerate() {
            mm.request_match(*id, &none, all_live);
            if i % 3 == 2 {
                mm.release(c[i - 1]);
            }
            mm.assert_invariants();
        }
        for id in &c {
            mm.release(*id);
            mm.assert_invariants();
        }
        assert_eq!(mm.waiting_len(), 0);
        assert_eq!(mm.pair_count(), 0);
    }
}
