//! FIFO dedup state shared by all three streams (spec §3 "Dedup state (streams)"): `{order: FIFO
//! of ids, members: set of ids}`, O(1) insertion, oldest evicted once the cap is exceeded.

use std::collections::{HashSet, VecDeque};

use starknet_client_primitives::Felt252;

/// Invariant: `members.len() == order.len()`, and membership in `members` holds exactly for ids
/// currently present in `order`.
#[derive(Debug, Clone)]
pub struct SeenState {
    order: VecDeque<Felt252>,
    members: HashSet<Felt252>,
    cap: usize,
}

impl SeenState {
    pub fn new(cap: usize) -> Self {
        Self { order: VecDeque::new(), members: HashSet::new(), cap: cap.max(1) }
    }

    pub fn contains(&self, id: &Felt252) -> bool {
        self.members.contains(id)
    }

    /// Records `id` if not already present, evicting the oldest entry first if the FIFO is at
    /// capacity. Returns `true` if this is the first time `id` has been seen.
    pub fn insert_if_new(&mut self, id: Felt252) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push_back(id);
        if self.order.len() > self.cap {
            if let Some(evicted) = self.order.pop_front() {
                self.members.remove(&evicted);
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insert_of_an_id_returns_true_repeats_return_false() {
        let mut seen = SeenState::new(10);
        assert!(seen.insert_if_new(Felt252::from_u64(1)));
        assert!(!seen.insert_if_new(Felt252::from_u64(1)));
    }

    #[test]
    fn cardinality_never_exceeds_the_cap() {
        let mut seen = SeenState::new(3);
        for i in 0..10 {
            seen.insert_if_new(Felt252::from_u64(i));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn eviction_is_oldest_first() {
        let mut seen = SeenState::new(2);
        seen.insert_if_new(Felt252::from_u64(1));
        seen.insert_if_new(Felt252::from_u64(2));
        seen.insert_if_new(Felt252::from_u64(3));
        assert!(!seen.contains(&Felt252::from_u64(1)));
        assert!(seen.contains(&Felt252::from_u64(2)));
        assert!(seen.contains(&Felt252::from_u64(3)));
    }

    #[test]
    fn clear_resets_membership_so_previously_seen_ids_are_new_again() {
        let mut seen = SeenState::new(10);
        seen.insert_if_new(Felt252::from_u64(1));
        seen.clear();
        assert!(seen.is_empty());
        assert!(seen.insert_if_new(Felt252::from_u64(1)));
    }
}
