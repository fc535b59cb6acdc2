use criterion::{criterion_group, criterion_main, Criterion};
use hybrid_core::corpus::demo_essays;
use hybrid_core::encoder::Bm25Encoder;
use hybrid_core::tokenizer::Tokenizer;

fn bench_tokenize(c: &mut Criterion) {
    let text: String = demo_essays().iter().map(|d| d.content.clone()).collect::<Vec<_>>().join(" ");
    let tok = Tokenizer::default();
    c.bench_function("tokenize_essays", |b| b.iter(|| tok.tokenize(&text)));
}

fn bench_encode(c: &mut Criterion) {
    let essays = demo_essays();
    let contents: Vec<&str> = essays.iter().map(|d| d.content.as_str()).collect();
    let mut enc = Bm25Encoder::default();
    enc.fit(&contents).unwrap();
    c.bench_function("encode_document", |b| b.iter(|| enc.encode_document(contents[0]).unwrap()));
    c.bench_function("encode_query", |b| {
        b.iter(|| enc.encode_query("Global warming is a major issue").unwrap())
    });
}

criterion_group!(benches, bench_tokenize, bench_encode);
criterion_main!(benches);
