use criterion::{criterion_group, criterion_main, Criterion};
use std::path::Path;

use maildecode::model::email::Envelope;
use maildecode::parser::decode_message;

fn load(name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read(path).unwrap()
}

fn bench_decode_alternative(c: &mut Criterion) {
    let raw = load("alternative.eml");
    let envelope = Envelope::new("alice@example.com", "bob@example.org");

    c.bench_function("decode_alternative", |b| {
        b.iter(|| decode_message(&envelope, &raw))
    });
}

fn bench_decode_nested(c: &mut Criterion) {
    let raw = load("nested.eml");
    let envelope = Envelope::new("news@example.com", "bob@example.org");

    c.bench_function("decode_nested", |b| {
        b.iter(|| decode_message(&envelope, &raw))
    });
}

criterion_group!(benches, bench_decode_alternative, bench_decode_nested);
criterion_main!(benches);
