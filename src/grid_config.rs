//! The static description of a grid: which slots exist, where they are, and how they cross. The
//! solver only ever reads this.

use smallvec::{smallvec, SmallVec};
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};

use crate::errors::InputError;
use crate::word_list::WordList;
use crate::{SlotId, MAX_SLOT_COUNT, MAX_SLOT_LENGTH};

/// Zero-indexed (row, column) coords for a cell in the grid, where row = 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Across,
    Down,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A struct representing a crossing between one slot and another, referencing the other slot's id
/// and the location of the intersection within the other slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub other_slot_cell: usize,
}

/// A struct representing the aspects of a slot in the grid that are static during filling.
#[derive(Clone)]
pub struct SlotConfig {
    pub id: SlotId,
    pub start_cell: GridCoord,
    pub direction: Direction,
    pub length: usize,

    /// One entry per cell of the slot; `Some` where another slot crosses that cell.
    pub crossings: SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>,
}

impl Debug for SlotConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotConfig")
            .field("id", &self.id)
            .field("start_cell", &self.start_cell)
            .field("direction", &self.direction)
            .field("length", &self.length)
            .field("crossings", &self.crossings)
            .finish()
    }
}

impl Display for SlotConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {} : {}", self.start_cell, self.direction, self.length)
    }
}

impl SlotConfig {
    /// Generate the coords for each cell of this slot.
    pub fn cell_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        cell_coords(self.start_cell, self.direction, self.length)
    }
}

fn cell_coords(start: GridCoord, dir: Direction, len: usize) -> impl Iterator<Item = GridCoord> {
    (0..len).map(move |cell_idx| match dir {
        Direction::Across => (start.0, start.1 + cell_idx),
        Direction::Down => (start.0 + cell_idx, start.1),
    })
}

/// An across or down entry in the input to `generate_grid_config`.
#[derive(Debug, Clone)]
pub struct GridEntry {
    pub loc: GridCoord,
    pub len: usize,
    pub dir: Direction,
}

/// A struct representing the aspects of a grid that are static during filling: the slots, the
/// overlap relation between them, and the vocabulary every slot starts out with.
#[derive(Clone)]
pub struct GridConfig {
    pub word_list: WordList,
    pub slot_configs: SmallVec<[SlotConfig; MAX_SLOT_COUNT]>,
    pub width: usize,
    pub height: usize,

    /// Row-major flags for which cells can hold a letter.
    pub open_cells: Vec<bool>,

    /// Neighbor sets, derived from `crossings` and cached at construction time.
    neighbors: Vec<SmallVec<[SlotId; MAX_SLOT_LENGTH]>>,
}

impl Debug for GridConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridConfig")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("slot_configs", &self.slot_configs)
            .field("word_list", &self.word_list)
            .finish()
    }
}

impl GridConfig {
    pub fn slot_count(&self) -> usize {
        self.slot_configs.len()
    }

    /// The overlap relation: if `x` and `y` cross, the index into `x`'s word and the index into
    /// `y`'s word that must hold the same letter.
    pub fn overlap(&self, x: SlotId, y: SlotId) -> Option<(usize, usize)> {
        if x == y {
            return None;
        }
        self.slot_configs[x]
            .crossings
            .iter()
            .enumerate()
            .find_map(|(cell_idx, crossing_opt)| match crossing_opt {
                Some(crossing) if crossing.other_slot_id == y => {
                    Some((cell_idx, crossing.other_slot_cell))
                }
                _ => None,
            })
    }

    /// All other slots that cross `slot_id`, in order of the cell they cross at.
    pub fn neighbors(&self, slot_id: SlotId) -> &[SlotId] {
        &self.neighbors[slot_id]
    }

    pub fn is_open(&self, (row, col): GridCoord) -> bool {
        row < self.height && col < self.width && self.open_cells[row * self.width + col]
    }
}

/// Slots, crossings and neighbor sets derived from a list of entries, before the grid's
/// dimensions are known.
struct SlotLayout {
    slot_configs: SmallVec<[SlotConfig; MAX_SLOT_COUNT]>,
    neighbors: Vec<SmallVec<[SlotId; MAX_SLOT_LENGTH]>>,
    covered_cells: Vec<GridCoord>,
}

/// Generate a GridConfig representing a grid with the specified entries. The grid is sized to fit
/// the entries, and only cells covered by some entry are open.
pub fn generate_grid_config(
    word_list: WordList,
    entries: &[GridEntry],
) -> Result<GridConfig, InputError> {
    let layout = build_slot_layout(entries)?;

    let height = layout.covered_cells.iter().map(|&(row, _)| row + 1).max().unwrap_or(0);
    let width = layout.covered_cells.iter().map(|&(_, col)| col + 1).max().unwrap_or(0);
    let mut open_cells = vec![false; width * height];
    for &(row, col) in &layout.covered_cells {
        open_cells[row * width + col] = true;
    }

    Ok(GridConfig {
        word_list,
        slot_configs: layout.slot_configs,
        width,
        height,
        open_cells,
        neighbors: layout.neighbors,
    })
}

fn build_slot_layout(entries: &[GridEntry]) -> Result<SlotLayout, InputError> {
    if entries.is_empty() {
        return Err(InputError::NoSlots);
    }
    if let Some(entry) = entries.iter().find(|entry| entry.len == 0) {
        return Err(InputError::EmptySlot { loc: entry.loc });
    }

    // Build a map from cell location to the entries involved, which we can then use to calculate
    // crossings.
    let mut entries_by_loc: HashMap<GridCoord, SmallVec<[(usize, usize); 2]>> = HashMap::new();

    for (entry_idx, entry) in entries.iter().enumerate() {
        for (cell_idx, loc) in cell_coords(entry.loc, entry.dir, entry.len).enumerate() {
            let cell_entries = entries_by_loc.entry(loc).or_insert_with(SmallVec::new);
            if cell_entries.len() == 2 {
                return Err(InputError::ConflictingSlots {
                    loc,
                    reason: "more than two slots share a cell",
                });
            }
            cell_entries.push((entry_idx, cell_idx));
        }
    }

    let mut slot_configs: SmallVec<[SlotConfig; MAX_SLOT_COUNT]> = smallvec![];
    let mut neighbors: Vec<SmallVec<[SlotId; MAX_SLOT_LENGTH]>> = Vec::with_capacity(entries.len());

    for (entry_idx, entry) in entries.iter().enumerate() {
        let mut crossings: SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]> = smallvec![];
        let mut slot_neighbors: SmallVec<[SlotId; MAX_SLOT_LENGTH]> = smallvec![];

        for loc in cell_coords(entry.loc, entry.dir, entry.len) {
            let crossing = entries_by_loc[&loc]
                .iter()
                .find(|&&(other_idx, _)| other_idx != entry_idx)
                .map(|&(other_slot_id, other_slot_cell)| Crossing { other_slot_id, other_slot_cell });

            if let Some(crossing) = crossing {
                if slot_neighbors.contains(&crossing.other_slot_id) {
                    return Err(InputError::ConflictingSlots {
                        loc,
                        reason: "two slots overlap in more than one cell",
                    });
                }
                slot_neighbors.push(crossing.other_slot_id);
            }
            crossings.push(crossing);
        }

        slot_configs.push(SlotConfig {
            id: entry_idx,
            start_cell: entry.loc,
            direction: entry.dir,
            length: entry.len,
            crossings,
        });
        neighbors.push(slot_neighbors);
    }

    Ok(SlotLayout {
        slot_configs,
        neighbors,
        covered_cells: entries_by_loc.into_keys().collect(),
    })
}

/// Generate a grid config from a structure string, with `_` representing fillable cells and any
/// other character representing blocks. Every run of two or more fillable cells becomes a slot;
/// across slots are numbered first, then down slots.
pub fn generate_grid_config_from_structure(
    word_list: WordList,
    structure: &str,
) -> Result<GridConfig, InputError> {
    let rows: Vec<Vec<bool>> = structure
        .lines()
        .map(|line| line.trim_end_matches('\r').chars().map(|c| c == '_').collect())
        .collect();

    let height = rows.len();
    let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    let is_open = |row: usize, col: usize| rows[row].get(col).copied().unwrap_or(false);

    // Collect ((line, start), length) for each run of two or more open cells, scanning each line
    // position by position.
    fn build_runs(
        line_count: usize,
        line_length: usize,
        open: impl Fn(usize, usize) -> bool,
    ) -> Vec<((usize, usize), usize)> {
        let mut result = vec![];

        for line in 0..line_count {
            let mut run_start: Option<usize> = None;

            for pos in 0..=line_length {
                let open_here = pos < line_length && open(line, pos);
                match (open_here, run_start) {
                    (true, None) => run_start = Some(pos),
                    (false, Some(start)) => {
                        if pos - start > 1 {
                            result.push(((line, start), pos - start));
                        }
                        run_start = None;
                    }
                    _ => {}
                }
            }
        }

        result
    }

    let mut entries: Vec<GridEntry> = vec![];

    for ((row, col), len) in build_runs(height, width, |row, col| is_open(row, col)) {
        entries.push(GridEntry { loc: (row, col), len, dir: Direction::Across });
    }
    for ((col, row), len) in build_runs(width, height, |col, row| is_open(row, col)) {
        entries.push(GridEntry { loc: (row, col), len, dir: Direction::Down });
    }

    let layout = build_slot_layout(&entries)?;

    // The structure's own dimensions, so isolated open cells and trailing blocks still render.
    let open_cells = (0..height)
        .flat_map(|row| (0..width).map(move |col| (row, col)))
        .map(|(row, col)| is_open(row, col))
        .collect();

    Ok(GridConfig {
        word_list,
        slot_configs: layout.slot_configs,
        width,
        height,
        open_cells,
        neighbors: layout.neighbors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_config::Direction::{Across, Down};

    fn word_list() -> WordList {
        WordList::parse_from_str("one\ntwo\nthree").unwrap()
    }

    /// #___#
    /// #_##_
    /// #_##_
    /// #_##_
    /// #____
    #[test]
    fn test_structure_parsing_finds_slots_and_overlaps() {
        let config = generate_grid_config_from_structure(
            word_list(),
            "#___#\n#_##_\n#_##_\n#_##_\n#____\n",
        )
        .unwrap();

        assert_eq!((config.width, config.height), (5, 5));

        let slots: Vec<_> = config
            .slot_configs
            .iter()
            .map(|slot| (slot.start_cell, slot.direction, slot.length))
            .collect();
        assert_eq!(
            slots,
            vec![
                ((0, 1), Across, 3),
                ((4, 1), Across, 4),
                ((0, 1), Down, 5),
                ((1, 4), Down, 4),
            ]
        );

        assert_eq!(config.overlap(0, 2), Some((0, 0)));
        assert_eq!(config.overlap(2, 0), Some((0, 0)));
        assert_eq!(config.overlap(1, 2), Some((0, 4)));
        assert_eq!(config.overlap(1, 3), Some((3, 3)));
        assert_eq!(config.overlap(0, 3), None);
        assert_eq!(config.overlap(0, 0), None);

        assert_eq!(config.neighbors(1), &[2, 3]);
        assert_eq!(config.neighbors(0), &[2]);
        assert!(!config.is_open((0, 0)));
        assert!(config.is_open((4, 4)));
    }

    #[test]
    fn test_overlap_relation_is_symmetric() {
        let config = generate_grid_config(
            word_list(),
            &[
                GridEntry { loc: (0, 0), len: 3, dir: Across },
                GridEntry { loc: (2, 0), len: 3, dir: Across },
                GridEntry { loc: (0, 0), len: 3, dir: Down },
                GridEntry { loc: (0, 2), len: 3, dir: Down },
            ],
        )
        .unwrap();

        for x in 0..config.slot_count() {
            for y in 0..config.slot_count() {
                let forward = config.overlap(x, y);
                let backward = config.overlap(y, x).map(|(j, i)| (i, j));
                assert_eq!(forward, backward, "overlap({x}, {y})");
                assert_eq!(forward.is_some(), config.neighbors(x).contains(&y));
            }
        }
    }

    #[test]
    fn test_structure_dimensions_come_from_the_structure() {
        // The bottom-left cell is open but in no slot, and the last column is all blocks.
        let config = generate_grid_config_from_structure(word_list(), "___#\n#_##\n_###").unwrap();

        assert_eq!(config.slot_count(), 2);
        assert_eq!((config.width, config.height), (4, 3));
        assert_eq!(config.open_cells.len(), 12);
        assert!(config.is_open((2, 0)));
        assert!(!config.is_open((0, 3)));
        assert!(!config.is_open((1, 0)));

        // Built from entries alone, the same slots only cover the cells they touch.
        let from_entries = generate_grid_config(
            word_list(),
            &[
                GridEntry { loc: (0, 0), len: 3, dir: Across },
                GridEntry { loc: (0, 1), len: 2, dir: Down },
            ],
        )
        .unwrap();
        assert_eq!((from_entries.width, from_entries.height), (3, 2));
        assert!(!from_entries.is_open((2, 0)));
        assert!(from_entries.is_open((1, 1)));
    }

    #[test]
    fn test_single_cell_runs_are_not_slots() {
        let config = generate_grid_config_from_structure(word_list(), "_#_\n___\n_#_").unwrap();
        assert_eq!(config.slot_count(), 3);
        assert!(config.slot_configs.iter().all(|slot| slot.length == 3));
    }

    #[test]
    fn test_malformed_structures_are_rejected() {
        let err = generate_grid_config_from_structure(word_list(), "#_#\n###").unwrap_err();
        assert!(matches!(err, InputError::NoSlots));

        let err = generate_grid_config(
            word_list(),
            &[GridEntry { loc: (0, 0), len: 0, dir: Across }],
        )
        .unwrap_err();
        assert!(matches!(err, InputError::EmptySlot { loc: (0, 0) }));

        let err = generate_grid_config(
            word_list(),
            &[
                GridEntry { loc: (0, 0), len: 3, dir: Across },
                GridEntry { loc: (0, 1), len: 3, dir: Across },
            ],
        )
        .unwrap_err();
        assert!(matches!(err, InputError::ConflictingSlots { .. }));
    }
}
