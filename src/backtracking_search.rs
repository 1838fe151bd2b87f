//! This module fills a grid by making it node- and arc-consistent up front and then running a
//! depth-first backtracking search over the pruned domains. Slots are chosen by minimum remaining
//! values (ties broken by degree), and candidate words are tried in least-constraining-value order.

use instant::{Duration, Instant};
use std::cmp::Reverse;

use crate::arc_consistency::{
    count_glyphs_at_cell, enforce_node_consistency, establish_arc_consistency, GlyphCounts,
};
use crate::assignment::{Assignment, Choice};
use crate::domains::Domains;
use crate::grid_config::GridConfig;
use crate::{SlotId, WordId, CHECK_INVARIANTS};

/// How many search states should we visit between checks of the deadline?
pub const INTERRUPT_FREQUENCY: u64 = 10;

/// A struct tracking stats about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Calls into the recursive search, i.e. partial assignments we tried to extend.
    pub states: u64,

    /// Tentative extensions of the assignment (one per candidate word considered).
    pub attempts: u64,

    /// Extensions that passed the consistency check but led to a dead end.
    pub backtracks: u64,

    pub revisions: u64,
    pub node_eliminations: u64,
    pub arc_eliminations: u64,
    pub node_consistency_time: Duration,
    pub arc_consistency_time: Duration,
    pub search_time: Duration,
    pub total_time: Duration,
}

/// Settings for a single call to `find_fill`.
#[derive(Debug, Clone, Default)]
pub struct FillOptions {
    /// Give up once this much time has passed. `None` means search until done.
    pub timeout: Option<Duration>,
}

/// A struct representing the results of a fill operation.
#[derive(Debug, Clone)]
pub struct FillSuccess {
    pub statistics: Statistics,

    /// One choice per slot, ordered by slot id.
    pub choices: Vec<Choice>,
}

impl FillSuccess {
    pub fn word_for(&self, slot_id: SlotId) -> Option<WordId> {
        self.choices
            .iter()
            .find(|choice| choice.slot_id == slot_id)
            .map(|choice| choice.word_id)
    }

    /// The chosen words as strings, ordered by slot id.
    pub fn words<'a>(&self, config: &'a GridConfig) -> Vec<&'a str> {
        self.choices
            .iter()
            .map(|choice| config.word_list.words[choice.word_id].string.as_str())
            .collect()
    }
}

/// The ways a fill attempt can come back empty. None of these are errors: they're all normal
/// answers to "is there a fill?".
#[derive(Debug, Clone)]
pub enum FillFailure {
    /// Node or arc consistency left a slot with no candidates, so search never started.
    EmptyDomain { slot_id: SlotId, statistics: Statistics },

    /// Search tried every candidate and found no complete, consistent assignment.
    HardFailure { statistics: Statistics },

    /// The deadline passed before search finished.
    Timeout { statistics: Statistics },
}

impl FillFailure {
    pub fn statistics(&self) -> &Statistics {
        match self {
            FillFailure::EmptyDomain { statistics, .. } => statistics,
            FillFailure::HardFailure { statistics } => statistics,
            FillFailure::Timeout { statistics } => statistics,
        }
    }
}

/// Choose the next slot to fill: the unassigned slot with the fewest remaining candidates, then
/// the one crossing the most other slots, then the lowest id. Returns `None` once every slot is
/// assigned.
pub fn select_unassigned_slot(
    config: &GridConfig,
    domains: &Domains,
    assignment: &Assignment,
) -> Option<SlotId> {
    (0..config.slot_count())
        .filter(|&slot_id| !assignment.is_assigned(slot_id))
        .min_by_key(|&slot_id| {
            (domains.len(slot_id), Reverse(config.neighbors(slot_id).len()), slot_id)
        })
}

/// Return the candidates for `slot_id`, ordered by how many options they would rule out among
/// the slot's unassigned neighbors. The first word rules out the fewest; ties keep `WordId` order.
pub fn order_domain_values(
    config: &GridConfig,
    domains: &Domains,
    assignment: &Assignment,
    slot_id: SlotId,
) -> Vec<WordId> {
    // For each unassigned neighbor: the cell in our slot that it crosses, the size of its domain,
    // and how many of its candidates put each glyph in the shared cell.
    let crossing_counts: Vec<(usize, usize, GlyphCounts)> = config
        .neighbors(slot_id)
        .iter()
        .filter(|&&neighbor| !assignment.is_assigned(neighbor))
        .filter_map(|&neighbor| {
            let (cell, neighbor_cell) = config.overlap(slot_id, neighbor)?;
            Some((
                cell,
                domains.len(neighbor),
                count_glyphs_at_cell(config, domains, neighbor, neighbor_cell),
            ))
        })
        .collect();

    let words = &config.word_list.words;

    let mut ordered: Vec<(usize, WordId)> = domains
        .words(slot_id)
        .map(|word_id| {
            let word = &words[word_id];
            let ruled_out: usize = crossing_counts
                .iter()
                .map(|(cell, neighbor_option_count, glyph_counts)| {
                    let compatible = word
                        .glyphs
                        .get(*cell)
                        .map_or(0, |&glyph| glyph_counts[glyph] as usize);
                    neighbor_option_count - compatible
                })
                .sum();
            (ruled_out, word_id)
        })
        .collect();

    ordered.sort_unstable();
    ordered.into_iter().map(|(_, word_id)| word_id).collect()
}

enum SearchOutcome {
    Complete(Vec<Choice>),
    Exhausted,
    TimedOut,
}

/// State shared by every level of the recursive search. The domains are only read here; per-step
/// narrowing happens through the assignment, which is rolled back as the recursion unwinds.
struct Search<'a> {
    config: &'a GridConfig,
    domains: &'a Domains,
    deadline: Option<Instant>,
    statistics: Statistics,
}

impl Search<'_> {
    fn backtrack(&mut self, assignment: &mut Assignment) -> SearchOutcome {
        // No unassigned slot left means the assignment is complete.
        let Some(slot_id) = select_unassigned_slot(self.config, self.domains, assignment) else {
            return SearchOutcome::Complete(assignment.choices());
        };

        self.statistics.states += 1;
        if self.statistics.states % INTERRUPT_FREQUENCY == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return SearchOutcome::TimedOut;
                }
            }
        }

        for word_id in order_domain_values(self.config, self.domains, assignment, slot_id) {
            self.statistics.attempts += 1;

            let mut extended = assignment.extend(slot_id, word_id);
            if !extended.is_consistent_at(self.config, slot_id) {
                continue;
            }
            if CHECK_INVARIANTS && !extended.is_consistent(self.config) {
                panic!("Accepted an inconsistent assignment: {:?}", *extended);
            }

            match self.backtrack(&mut extended) {
                SearchOutcome::Exhausted => self.statistics.backtracks += 1,
                outcome => return outcome,
            }
        }

        SearchOutcome::Exhausted
    }
}

/// Search for a complete, consistent fill for the given grid: establish node consistency, then
/// arc consistency, and only if neither empties a domain, run the backtracking search.
pub fn find_fill(config: &GridConfig, options: &FillOptions) -> Result<FillSuccess, FillFailure> {
    let start = Instant::now();
    let deadline = options.timeout.map(|timeout| start + timeout);
    let mut statistics = Statistics::default();

    let mut domains = Domains::new(config);

    statistics.node_eliminations = enforce_node_consistency(config, &mut domains) as u64;
    statistics.node_consistency_time = start.elapsed();
    log::debug!(
        "Node consistency removed {} options; {} remain",
        statistics.node_eliminations,
        domains.total_option_count(),
    );

    // A slot with no crossings never gets revised by AC-3, so check for empty domains here too.
    if let Some(slot_id) = domains.first_empty_slot() {
        log::info!("No words fit slot {} ({})", slot_id, config.slot_configs[slot_id]);
        statistics.total_time = start.elapsed();
        return Err(FillFailure::EmptyDomain { slot_id, statistics });
    }

    let arc_consistency_start = Instant::now();
    let arc_consistency_result = establish_arc_consistency(config, &mut domains, None);
    statistics.arc_consistency_time = arc_consistency_start.elapsed();

    match arc_consistency_result {
        Ok(success) => {
            statistics.revisions = success.revisions as u64;
            statistics.arc_eliminations = success.eliminations as u64;
            log::debug!(
                "Arc consistency removed {} options in {} revisions; {} remain",
                success.eliminations,
                success.revisions,
                domains.total_option_count(),
            );
        }
        Err(failure) => {
            statistics.revisions = failure.revisions as u64;
            statistics.arc_eliminations = failure.eliminations as u64;
            statistics.total_time = start.elapsed();
            log::info!(
                "Arc consistency left slot {} ({}) with no options",
                failure.slot_id,
                config.slot_configs[failure.slot_id],
            );
            return Err(FillFailure::EmptyDomain { slot_id: failure.slot_id, statistics });
        }
    }

    let search_start = Instant::now();
    let mut search = Search { config, domains: &domains, deadline, statistics };
    let mut assignment = Assignment::new(config);
    let outcome = search.backtrack(&mut assignment);

    let mut statistics = search.statistics;
    statistics.search_time = search_start.elapsed();
    statistics.total_time = start.elapsed();

    match outcome {
        SearchOutcome::Complete(choices) => {
            log::info!(
                "Found a fill after {} states and {} backtracks in {:?}",
                statistics.states,
                statistics.backtracks,
                statistics.total_time,
            );
            Ok(FillSuccess { statistics, choices })
        }
        SearchOutcome::Exhausted => {
            log::info!("Search exhausted after {} states", statistics.states);
            Err(FillFailure::HardFailure { statistics })
        }
        SearchOutcome::TimedOut => {
            log::info!("Search timed out after {:?}", statistics.total_time);
            Err(FillFailure::Timeout { statistics })
        }
    }
}
