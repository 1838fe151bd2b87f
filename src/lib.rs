//! Crossword fill as a constraint-satisfaction problem: every slot in a grid gets one word of the
//! right length, no word is used twice, and crossing slots agree on their shared letters.
//!
//! ```
//! use crossfill::backtracking_search::{find_fill, FillOptions};
//! use crossfill::grid_config::generate_grid_config_from_structure;
//! use crossfill::render::render_grid;
//! use crossfill::word_list::WordList;
//!
//! let word_list = WordList::parse_from_str("cat\ncar\nart")?;
//! let config = generate_grid_config_from_structure(word_list, "___\n_##\n_##")?;
//!
//! match find_fill(&config, &FillOptions::default()) {
//!     Ok(result) => println!("{}", render_grid(&config, &result.choices)),
//!     Err(_) => println!("No solution."),
//! }
//! # Ok::<(), crossfill::errors::InputError>(())
//! ```

pub mod arc_consistency;
pub mod assignment;
pub mod backtracking_search;
pub mod domains;
pub mod errors;
pub mod grid_config;
pub mod log;
pub mod render;
pub mod word_list;

/// Should we run extra checks to validate that we're never in an invalid state during search? This
/// can be enabled with `--features check_invariants` when debugging or making risky algorithm
/// changes.
pub const CHECK_INVARIANTS: bool = cfg!(feature = "check_invariants");

/// The expected maximum number of distinct characters appearing in a word list.
pub const MAX_GLYPH_COUNT: usize = 256;

/// The expected maximum number of slots appearing in a grid.
pub const MAX_SLOT_COUNT: usize = 256;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// An identifier for a given letter, based on its index in the word list's `glyphs` field.
pub type GlyphId = usize;

/// An identifier for a given slot, based on its index in the grid's `slot_configs` field.
pub type SlotId = usize;

/// An identifier for a given word, based on its index in the word list's `words` field.
pub type WordId = usize;
