use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fs;

use crossfill::backtracking_search::{find_fill, FillOptions};
use crossfill::grid_config::{generate_grid_config_from_structure, GridConfig};
use crossfill::word_list::WordList;

fn fixture_config(structure: &str, words: &str) -> GridConfig {
    let word_list = WordList::load_from_path(format!("tests/fixtures/{words}")).unwrap();
    let structure = fs::read_to_string(format!("tests/fixtures/{structure}")).unwrap();
    generate_grid_config_from_structure(word_list, &structure).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let structure0 = fixture_config("structure0.txt", "words0.txt");
    c.bench_function("fill structure0", |b| {
        b.iter(|| find_fill(black_box(&structure0), &FillOptions::default()))
    });

    let structure1 = fixture_config("structure1.txt", "words1.txt");
    c.bench_function("fill structure1", |b| {
        b.iter(|| find_fill(black_box(&structure1), &FillOptions::default()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
