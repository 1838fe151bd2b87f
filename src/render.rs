use crate::assignment::Choice;
use crate::grid_config::GridConfig;

/// Character used for cells that can't hold a letter.
pub const BLOCK: char = '█';

/// Turn the given grid config and fill choices into a rendered string, one line per row. Open
/// cells without a letter are shown as spaces.
pub fn render_grid(config: &GridConfig, choices: &[Choice]) -> String {
    let mut grid: Vec<Vec<char>> = (0..config.height)
        .map(|row| {
            (0..config.width)
                .map(|col| if config.is_open((row, col)) { ' ' } else { BLOCK })
                .collect()
        })
        .collect();

    for &Choice { slot_id, word_id } in choices {
        let slot_config = &config.slot_configs[slot_id];
        let word = &config.word_list.words[word_id];

        for ((row, col), &glyph) in slot_config.cell_coords().zip(&word.glyphs) {
            grid[row][col] = config.word_list.glyphs[glyph];
        }
    }

    grid.iter()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_config::generate_grid_config_from_structure;
    use crate::word_list::WordList;

    #[test]
    fn test_render_partial_and_complete_fills() {
        let config = generate_grid_config_from_structure(
            WordList::parse_from_str("car\ncat").unwrap(),
            "___#\n_###\n_#_#",
        )
        .unwrap();

        assert_eq!(render_grid(&config, &[]), "   █\n ███\n █ █");

        let choices = [Choice { slot_id: 0, word_id: 0 }, Choice { slot_id: 1, word_id: 1 }];
        assert_eq!(render_grid(&config, &choices), "CAR█\nA███\nT█ █");
    }
}
