use bit_set::BitSet;
use std::fmt::{Debug, Formatter};

use crate::grid_config::GridConfig;
use crate::{SlotId, WordId};

/// The set of candidate words for each slot. Every slot starts out with the whole vocabulary and
/// can only lose candidates from there.
#[derive(Clone, PartialEq, Eq)]
pub struct Domains {
    /// Indexed by `SlotId`; each set contains `WordId`s into the grid's word list.
    options_by_slot: Vec<BitSet>,

    /// Cached size of each set, since `BitSet::len` has to scan.
    remaining_option_counts: Vec<usize>,
}

impl Debug for Domains {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Domains")
            .field("remaining_option_counts", &self.remaining_option_counts)
            .finish()
    }
}

impl Domains {
    /// Seed every slot's domain with the full vocabulary.
    pub fn new(config: &GridConfig) -> Domains {
        let word_count = config.word_list.len();
        let mut full_vocabulary = BitSet::with_capacity(word_count);
        for word_id in 0..word_count {
            full_vocabulary.insert(word_id);
        }

        Domains {
            options_by_slot: (0..config.slot_count()).map(|_| full_vocabulary.clone()).collect(),
            remaining_option_counts: vec![word_count; config.slot_count()],
        }
    }

    /// The candidates currently remaining for a slot, in ascending `WordId` order.
    pub fn words(&self, slot_id: SlotId) -> DomainWords<'_> {
        DomainWords {
            inner: self.options_by_slot[slot_id].iter(),
            remaining: self.remaining_option_counts[slot_id],
        }
    }

    pub fn contains(&self, slot_id: SlotId, word_id: WordId) -> bool {
        self.options_by_slot[slot_id].contains(word_id)
    }

    pub fn len(&self, slot_id: SlotId) -> usize {
        self.remaining_option_counts[slot_id]
    }

    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.remaining_option_counts[slot_id] == 0
    }

    /// Remove a single word from a single slot's domain. Returns whether it was present.
    pub fn remove(&mut self, slot_id: SlotId, word_id: WordId) -> bool {
        let removed = self.options_by_slot[slot_id].remove(word_id);
        if removed {
            self.remaining_option_counts[slot_id] -= 1;
        }
        removed
    }

    /// Remove every word matching `predicate` from a slot's domain, returning how many went.
    pub fn remove_where<F>(&mut self, slot_id: SlotId, mut predicate: F) -> usize
    where
        F: FnMut(WordId) -> bool,
    {
        let doomed: Vec<WordId> = self.words(slot_id).filter(|&word_id| predicate(word_id)).collect();
        for &word_id in &doomed {
            self.remove(slot_id, word_id);
        }
        doomed.len()
    }

    pub fn slot_count(&self) -> usize {
        self.options_by_slot.len()
    }

    /// The lowest-numbered slot with nothing left in its domain, if any.
    pub fn first_empty_slot(&self) -> Option<SlotId> {
        self.remaining_option_counts.iter().position(|&count| count == 0)
    }

    pub fn total_option_count(&self) -> usize {
        self.remaining_option_counts.iter().sum()
    }
}

/// Iterator over one slot's remaining candidates. `bit_set::Iter` under-reports its upper size
/// bound, which adapters like `Filter::count` rely on, so we report the cached count instead.
pub struct DomainWords<'a> {
    inner: bit_set::Iter<'a, u32>,
    remaining: usize,
}

impl Iterator for DomainWords<'_> {
    type Item = WordId;

    fn next(&mut self) -> Option<WordId> {
        let word_id = self.inner.next()?;
        self.remaining -= 1;
        Some(word_id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for DomainWords<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_config::Direction::{Across, Down};
    use crate::grid_config::{generate_grid_config, GridEntry};
    use crate::word_list::WordList;

    #[test]
    fn test_domains_start_full_and_only_shrink() {
        let config = generate_grid_config(
            WordList::parse_from_str("cat\ndog\nbird").unwrap(),
            &[
                GridEntry { loc: (0, 0), len: 3, dir: Across },
                GridEntry { loc: (0, 0), len: 3, dir: Down },
            ],
        )
        .unwrap();

        let mut domains = Domains::new(&config);
        assert_eq!(domains.slot_count(), 2);
        assert_eq!(domains.words(0).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(domains.total_option_count(), 6);

        assert!(domains.remove(0, 1));
        assert!(!domains.remove(0, 1));
        assert!(!domains.contains(0, 1));
        assert!(domains.contains(1, 1), "removal is local to one slot");
        assert_eq!(domains.len(0), 2);

        assert_eq!(domains.remove_where(0, |word_id| word_id == 0 || word_id == 2), 2);
        assert!(domains.is_empty(0));
        assert_eq!(domains.first_empty_slot(), Some(0));
        assert_eq!(domains.len(1), 3);
    }

    #[test]
    fn test_words_reports_exact_size_after_removals() {
        let config = generate_grid_config(
            WordList::parse_from_str("aaa\nbbb\nccc\nddd\neee\nfff\nggg\nhhh").unwrap(),
            &[GridEntry { loc: (0, 0), len: 3, dir: Across }],
        )
        .unwrap();

        let mut domains = Domains::new(&config);
        domains.remove(0, 0);
        domains.remove(0, 1);

        let mut words = domains.words(0);
        assert_eq!(words.size_hint(), (6, Some(6)));
        assert_eq!(words.len(), 6);
        words.next();
        assert_eq!(words.len(), 5);

        assert_eq!(domains.words(0).filter(|_| true).count(), 6);
        assert_eq!(domains.words(0).filter(|&word_id| word_id % 2 == 0).count(), 3);
        assert_eq!(domains.words(0).collect::<Vec<_>>(), vec![2, 3, 4, 5, 6, 7]);
    }
}
