//! Constraint propagation over the domain store: node consistency for the unary length
//! constraint, and AC-3 for the binary crossing constraints.

use bit_set::BitSet;
use smallvec::{smallvec, SmallVec};
use std::collections::VecDeque;

use crate::domains::Domains;
use crate::grid_config::GridConfig;
use crate::{SlotId, MAX_GLYPH_COUNT};

/// For each glyph, the number of words in a domain that place it in a particular cell.
pub type GlyphCounts = SmallVec<[u32; MAX_GLYPH_COUNT]>;

/// Count how many words in `slot_id`'s domain have each glyph at `cell_idx`. Words too short to
/// have that cell are skipped.
pub fn count_glyphs_at_cell(
    config: &GridConfig,
    domains: &Domains,
    slot_id: SlotId,
    cell_idx: usize,
) -> GlyphCounts {
    let mut counts: GlyphCounts = smallvec![0; config.word_list.glyphs.len()];

    for word_id in domains.words(slot_id) {
        if let Some(&glyph) = config.word_list.words[word_id].glyphs.get(cell_idx) {
            counts[glyph] += 1;
        }
    }

    counts
}

/// Remove every candidate whose length differs from its slot's length. Returns the number of
/// words removed across all slots.
pub fn enforce_node_consistency(config: &GridConfig, domains: &mut Domains) -> usize {
    let words = &config.word_list.words;

    config
        .slot_configs
        .iter()
        .map(|slot_config| {
            domains.remove_where(slot_config.id, |word_id| words[word_id].len() != slot_config.length)
        })
        .sum()
}

/// Make `x` arc consistent with `y`: drop every word from `x`'s domain that doesn't agree with at
/// least one word in `y`'s domain at their shared cell. Returns whether anything was removed.
///
/// `y`'s domain is read once up front, so the result reflects `y` as it stood before this call.
pub fn revise(config: &GridConfig, domains: &mut Domains, x: SlotId, y: SlotId) -> bool {
    let Some((x_cell, y_cell)) = config.overlap(x, y) else {
        return false;
    };

    let supported_glyph_counts = count_glyphs_at_cell(config, domains, y, y_cell);
    let words = &config.word_list.words;

    let removed = domains.remove_where(x, |word_id| {
        words[word_id]
            .glyphs
            .get(x_cell)
            .map_or(true, |&glyph| supported_glyph_counts[glyph] == 0)
    });

    removed > 0
}

/// Worklist of directed arcs for AC-3. An arc that's already waiting isn't queued twice.
#[derive(Debug)]
struct ArcQueue {
    queue: VecDeque<(SlotId, SlotId)>,
    queued: BitSet,
    slot_count: usize,
}

impl ArcQueue {
    fn new(slot_count: usize) -> ArcQueue {
        ArcQueue {
            queue: VecDeque::new(),
            queued: BitSet::with_capacity(slot_count * slot_count),
            slot_count,
        }
    }

    fn enqueue(&mut self, x: SlotId, y: SlotId) {
        if self.queued.insert(x * self.slot_count + y) {
            self.queue.push_back((x, y));
        }
    }

    fn pop_front(&mut self) -> Option<(SlotId, SlotId)> {
        let (x, y) = self.queue.pop_front()?;
        self.queued.remove(x * self.slot_count + y);
        Some((x, y))
    }
}

/// Results from a call to `establish_arc_consistency`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    pub revisions: usize,
    pub eliminations: usize,
}

/// Returned when propagation empties a slot's domain, meaning the puzzle has no fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub slot_id: SlotId,
    pub revisions: usize,
    pub eliminations: usize,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Run AC-3 until no more words can be eliminated, or until some slot's domain becomes empty.
///
/// If `arcs` is `None`, the worklist starts with every ordered pair of neighboring slots.
/// Otherwise it starts with exactly the given arcs, which is useful for re-propagating after a
/// few domains have been narrowed.
pub fn establish_arc_consistency(
    config: &GridConfig,
    domains: &mut Domains,
    arcs: Option<&[(SlotId, SlotId)]>,
) -> ArcConsistencyResult {
    let mut queue = ArcQueue::new(config.slot_count());

    match arcs {
        Some(arcs) => {
            for &(x, y) in arcs {
                queue.enqueue(x, y);
            }
        }
        None => {
            for slot_config in &config.slot_configs {
                for &neighbor in config.neighbors(slot_config.id) {
                    queue.enqueue(slot_config.id, neighbor);
                }
            }
        }
    }

    let starting_option_count = domains.total_option_count();
    let mut revisions = 0;

    while let Some((x, y)) = queue.pop_front() {
        revisions += 1;

        if !revise(config, domains, x, y) {
            continue;
        }

        if domains.is_empty(x) {
            log::debug!("Arc consistency emptied slot {} ({})", x, config.slot_configs[x]);
            return Err(ArcConsistencyFailure {
                slot_id: x,
                revisions,
                eliminations: starting_option_count - domains.total_option_count(),
            });
        }

        // Shrinking `x` may have removed the only support some neighbor had.
        for &z in config.neighbors(x) {
            if z != y {
                queue.enqueue(z, x);
            }
        }
    }

    Ok(ArcConsistencySuccess {
        revisions,
        eliminations: starting_option_count - domains.total_option_count(),
    })
}
