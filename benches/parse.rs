use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qsee::parse_str;
use std::fmt::Write;

fn synthetic_deck(sections: usize, entries_per_section: usize) -> String {
    let mut deck = String::from("# synthetic benchmark deck\n");
    for s in 0..sections {
        let _ = writeln!(deck, "[SEC{s}]");
        for e in 0..entries_per_section {
            let _ = writeln!(deck, "key{e} = value{e}");
            let _ = writeln!(deck, "list{e}[{s}] = {s}.{e}");
        }
        let _ = writeln!(deck, "block{s}:");
        let _ = writeln!(deck, "  H 0.0 0.0 {s}.0");
        let _ = writeln!(deck, "  O 1.0 0.0 {s}.0");
    }
    deck
}

fn bench_parse(c: &mut Criterion) {
    let small = synthetic_deck(4, 8);
    let large = synthetic_deck(64, 32);

    c.bench_function("parse_small_deck", |b| {
        b.iter(|| parse_str(black_box(&small)))
    });
    c.bench_function("parse_large_deck", |b| {
        b.iter(|| parse_str(black_box(&large)))
    });
}

fn bench_queries(c: &mut Criterion) {
    let deck = parse_str(&synthetic_deck(64, 32));
    let store = deck.store();

    c.bench_function("query_typed_get", |b| {
        b.iter(|| store.get::<String>(black_box("SEC32.KEY16")).unwrap())
    });
    c.bench_function("query_section_scan", |b| {
        b.iter(|| store.data_in_section(black_box("SEC32")))
    });
    c.bench_function("query_list_size", |b| {
        b.iter(|| store.list_size(black_box("SEC32.LIST16")))
    });
}

criterion_group!(benches, bench_parse, bench_queries);
criterion_main!(benches);
