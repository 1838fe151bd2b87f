use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter};
use std::fs;
use std::path::Path;

use crate::errors::InputError;
use crate::{GlyphId, WordId, MAX_GLYPH_COUNT, MAX_SLOT_LENGTH};

/// A struct representing a word that can be chosen for a slot.
#[derive(Debug, Clone)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[GlyphId; MAX_SLOT_LENGTH]>,
}

impl Word {
    /// Length in glyphs, which is what slot lengths are compared against.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// The full vocabulary available to every slot. Words are upper-cased and deduplicated, and keep
/// the order in which they first appeared so that `WordId`s are stable for a given input.
#[derive(Clone)]
pub struct WordList {
    /// Every distinct character appearing in any word, indexed by `GlyphId`.
    pub glyphs: SmallVec<[char; MAX_GLYPH_COUNT]>,
    pub words: Vec<Word>,
    glyph_ids_by_char: HashMap<char, GlyphId>,
}

impl Debug for WordList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordList")
            .field("glyphs", &self.glyphs)
            .field("words", &format!("({} entries)", self.words.len()))
            .finish()
    }
}

impl WordList {
    /// Build a word list from already-split words.
    pub fn from_words<S: AsRef<str>>(raw_words: &[S]) -> Result<WordList, InputError> {
        let mut word_list = WordList {
            glyphs: SmallVec::new(),
            words: Vec::with_capacity(raw_words.len()),
            glyph_ids_by_char: HashMap::new(),
        };
        let mut seen: HashSet<String> = HashSet::with_capacity(raw_words.len());

        for raw_word in raw_words {
            let string = raw_word.as_ref().trim().to_uppercase();
            if string.is_empty() || !seen.insert(string.clone()) {
                continue;
            }

            let glyphs = string.chars().map(|c| word_list.glyph_id_for(c)).collect();
            word_list.words.push(Word { string, glyphs });
        }

        if word_list.words.is_empty() {
            return Err(InputError::EmptyWordList);
        }

        Ok(word_list)
    }

    /// Parse a newline-delimited word list.
    pub fn parse_from_str(contents: &str) -> Result<WordList, InputError> {
        let lines: Vec<&str> = contents.lines().collect();
        WordList::from_words(&lines)
    }

    /// Read and parse a newline-delimited word list from disk.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<WordList, InputError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let word_list = WordList::parse_from_str(&contents)?;
        log::debug!("Loaded {} words from {}", word_list.words.len(), path.display());
        Ok(word_list)
    }

    fn glyph_id_for(&mut self, c: char) -> GlyphId {
        if let Some(&glyph_id) = self.glyph_ids_by_char.get(&c) {
            return glyph_id;
        }
        let glyph_id = self.glyphs.len();
        self.glyphs.push(c);
        self.glyph_ids_by_char.insert(c, glyph_id);
        glyph_id
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Look up a word by its string (case-insensitive).
    pub fn find(&self, string: &str) -> Option<WordId> {
        let string = string.to_uppercase();
        self.words.iter().position(|word| word.string == string)
    }
}
