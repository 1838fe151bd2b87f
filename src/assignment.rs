use bit_set::BitSet;
use std::fmt::{Debug, Formatter};
use std::ops::{Deref, DerefMut};

use crate::grid_config::GridConfig;
use crate::{SlotId, WordId};

/// A struct recording a slot assignment made during the filling process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Choice {
    pub slot_id: SlotId,
    pub word_id: WordId,
}

/// A partial mapping from slot to word, shared by the whole search. Choices are added with
/// `extend` and removed again when the returned `ScopedChoice` is dropped, so backtracking never
/// has to copy the assignment.
#[derive(Clone)]
pub struct Assignment {
    word_by_slot: Vec<Option<WordId>>,

    /// How many slots currently hold each word, indexed by `WordId`.
    word_use_counts: Vec<u32>,

    assigned_count: usize,
}

impl Debug for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assignment")
            .field("choices", &self.choices())
            .finish()
    }
}

impl Assignment {
    /// An empty assignment for the given grid.
    pub fn new(config: &GridConfig) -> Assignment {
        Assignment {
            word_by_slot: vec![None; config.slot_count()],
            word_use_counts: vec![0; config.word_list.len()],
            assigned_count: 0,
        }
    }

    pub fn word_for(&self, slot_id: SlotId) -> Option<WordId> {
        self.word_by_slot[slot_id]
    }

    pub fn is_assigned(&self, slot_id: SlotId) -> bool {
        self.word_by_slot[slot_id].is_some()
    }

    /// Does every slot have a word?
    pub fn is_complete(&self) -> bool {
        self.assigned_count == self.word_by_slot.len()
    }

    pub fn len(&self) -> usize {
        self.assigned_count
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_count == 0
    }

    /// The current choices, ordered by slot id.
    pub fn choices(&self) -> Vec<Choice> {
        self.word_by_slot
            .iter()
            .enumerate()
            .filter_map(|(slot_id, word_opt)| word_opt.map(|word_id| Choice { slot_id, word_id }))
            .collect()
    }

    /// Tentatively put `word_id` in `slot_id`. The choice lasts until the returned guard is
    /// dropped, on every exit path.
    ///
    /// Panics if the slot already holds a word: the search should never ask for that.
    pub fn extend(&mut self, slot_id: SlotId, word_id: WordId) -> ScopedChoice<'_> {
        if let Some(existing) = self.word_by_slot[slot_id] {
            panic!("Slot {slot_id} already holds word {existing}; can't place word {word_id}");
        }

        self.word_by_slot[slot_id] = Some(word_id);
        self.word_use_counts[word_id] += 1;
        self.assigned_count += 1;

        ScopedChoice { assignment: self, slot_id }
    }

    fn retract(&mut self, slot_id: SlotId) {
        if let Some(word_id) = self.word_by_slot[slot_id].take() {
            self.word_use_counts[word_id] -= 1;
            self.assigned_count -= 1;
        }
    }

    /// Check the full consistency predicate: no word is used twice, every word has its slot's
    /// length, and every pair of assigned crossing slots agrees on the shared letter.
    pub fn is_consistent(&self, config: &GridConfig) -> bool {
        let mut seen_words = BitSet::with_capacity(config.word_list.len());

        for (slot_id, word_opt) in self.word_by_slot.iter().enumerate() {
            let Some(word_id) = *word_opt else {
                continue;
            };

            if !seen_words.insert(word_id) {
                return false;
            }
            if !self.fits_crossings(config, slot_id, word_id) {
                return false;
            }
        }

        true
    }

    /// Check the consistency predicate for `slot_id` against everything else that's assigned.
    /// When the rest of the assignment was already consistent, this gives the same answer as
    /// `is_consistent` without looking at every pair.
    pub fn is_consistent_at(&self, config: &GridConfig, slot_id: SlotId) -> bool {
        let Some(word_id) = self.word_by_slot[slot_id] else {
            return true;
        };

        self.word_use_counts[word_id] == 1 && self.fits_crossings(config, slot_id, word_id)
    }

    /// Length check plus agreement with every assigned neighbor.
    fn fits_crossings(&self, config: &GridConfig, slot_id: SlotId, word_id: WordId) -> bool {
        let words = &config.word_list.words;
        let word = &words[word_id];

        if word.len() != config.slot_configs[slot_id].length {
            return false;
        }

        config.neighbors(slot_id).iter().all(|&neighbor| {
            let Some(neighbor_word_id) = self.word_by_slot[neighbor] else {
                return true;
            };
            let Some((cell, neighbor_cell)) = config.overlap(slot_id, neighbor) else {
                return true;
            };

            match (word.glyphs.get(cell), words[neighbor_word_id].glyphs.get(neighbor_cell)) {
                (Some(glyph), Some(neighbor_glyph)) => glyph == neighbor_glyph,
                _ => false,
            }
        })
    }
}

/// A choice that's been added to an `Assignment` and will be removed again when this guard goes
/// out of scope. Derefs to the assignment so the search can keep extending it.
pub struct ScopedChoice<'a> {
    assignment: &'a mut Assignment,
    slot_id: SlotId,
}

impl Deref for ScopedChoice<'_> {
    type Target = Assignment;

    fn deref(&self) -> &Assignment {
        self.assignment
    }
}

impl DerefMut for ScopedChoice<'_> {
    fn deref_mut(&mut self) -> &mut Assignment {
        self.assignment
    }
}

impl Drop for ScopedChoice<'_> {
    fn drop(&mut self) {
        self.assignment.retract(self.slot_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_config::Direction::{Across, Down};
    use crate::grid_config::{generate_grid_config, GridEntry};
    use crate::word_list::WordList;

    /// Slot 0 across and slot 1 down, crossing at their first letters.
    fn corner_config() -> GridConfig {
        generate_grid_config(
            WordList::parse_from_str("cat\ncar\nart\ndog\nox").unwrap(),
            &[
                GridEntry { loc: (0, 0), len: 3, dir: Across },
                GridEntry { loc: (0, 0), len: 3, dir: Down },
            ],
        )
        .unwrap()
    }

    fn word(config: &GridConfig, string: &str) -> WordId {
        config.word_list.find(string).unwrap()
    }

    #[test]
    fn test_matching_crossing_is_consistent() {
        let config = corner_config();
        let mut assignment = Assignment::new(&config);
        assert!(assignment.is_consistent(&config));

        let mut across = assignment.extend(0, word(&config, "car"));
        let down = across.extend(1, word(&config, "cat"));

        assert!(down.is_complete());
        assert!(down.is_consistent(&config));
        assert!(down.is_consistent_at(&config, 0));
        assert!(down.is_consistent_at(&config, 1));
    }

    #[test]
    fn test_conflicting_crossing_is_inconsistent() {
        let config = corner_config();
        let mut assignment = Assignment::new(&config);

        let mut across = assignment.extend(0, word(&config, "cat"));
        let down = across.extend(1, word(&config, "art"));

        assert!(!down.is_consistent(&config), "C and A disagree at the shared cell");
        assert!(!down.is_consistent_at(&config, 1));
    }

    #[test]
    fn test_repeated_word_is_inconsistent() {
        let config = corner_config();
        let mut assignment = Assignment::new(&config);

        let mut across = assignment.extend(0, word(&config, "cat"));
        let down = across.extend(1, word(&config, "cat"));

        assert!(!down.is_consistent(&config));
        assert!(!down.is_consistent_at(&config, 1));
    }

    #[test]
    fn test_wrong_length_is_inconsistent() {
        let config = corner_config();
        let mut assignment = Assignment::new(&config);

        let across = assignment.extend(0, word(&config, "ox"));

        assert!(!across.is_consistent(&config));
        assert!(!across.is_consistent_at(&config, 0));
    }

    #[test]
    fn test_scoped_choices_roll_back_on_drop() {
        let config = corner_config();
        let mut assignment = Assignment::new(&config);

        {
            let mut across = assignment.extend(0, word(&config, "dog"));
            {
                let down = across.extend(1, word(&config, "dog"));
                assert_eq!(down.len(), 2);
            }
            assert_eq!(across.len(), 1);
            assert!(!across.is_assigned(1));
            assert!(across.is_consistent(&config), "the duplicate went away with its scope");
        }

        assert!(assignment.is_empty());
        assert!(assignment.choices().is_empty());
    }

    #[test]
    fn test_rollback_happens_on_early_return() {
        fn try_word(assignment: &mut Assignment, config: &GridConfig, word_id: WordId) -> Option<()> {
            let across = assignment.extend(0, word_id);
            if !across.is_consistent(config) {
                return None;
            }
            Some(())
        }

        let config = corner_config();
        let mut assignment = Assignment::new(&config);

        assert_eq!(try_word(&mut assignment, &config, word(&config, "ox")), None);
        assert!(assignment.is_empty());
    }

    #[test]
    #[should_panic(expected = "already holds word")]
    fn test_extending_an_assigned_slot_panics() {
        let config = corner_config();
        let mut assignment = Assignment::new(&config);

        let mut across = assignment.extend(0, word(&config, "cat"));
        let _ = across.extend(0, word(&config, "car"));
    }
}
