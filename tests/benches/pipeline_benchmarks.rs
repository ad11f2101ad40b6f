//! # Ledger Projector Benchmarks
//!
//! | Stage | Measured |
//! |-------|----------|
//! | lp-01 Content codec | id128 ↔ id32 round trip |
//! | lp-03 Event decoder | topic lookup + ABI decode of one purchase log |
//! | lp-04 Normalizer | parsing a block envelope |
//! | lp-07 Pipeline | a signed delivery end to end, fresh and replayed |

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use std::sync::Arc;
use std::time::Duration;

use lp_01_content_codec::{from_on_chain, to_on_chain};
use lp_02_idempotency_ledger::{
    IdempotencyLedger, InMemoryProcessedEventStore, DEFAULT_RETENTION_SECS,
};
use lp_03_event_decoder::EventDecoder;
use lp_04_webhook_ingress::{normalize, Environment, GuardConfig, SignatureGuard};
use lp_05_domain_projector::DomainProjector;
use lp_07_api_gateway::{IngestMetrics, IngestionPipeline, WebhookRequest};
use lp_tests::fixtures::{block_delivery, purchase, tx, wallet, NOW, WEBHOOK_SECRET};
use shared_types::{sign_message_hex, ContentId, InMemoryProjectionStore, ManualTimeSource};

fn pipeline() -> IngestionPipeline {
    let clock = Arc::new(ManualTimeSource::new(NOW));
    IngestionPipeline::new(
        SignatureGuard::new(
            GuardConfig::new(WEBHOOK_SECRET, Environment::Production),
            clock.clone(),
        ),
        IdempotencyLedger::new(
            Arc::new(InMemoryProcessedEventStore::new(DEFAULT_RETENTION_SECS)),
            clock.clone(),
        ),
        EventDecoder::new(),
        DomainProjector::new(Arc::new(InMemoryProjectionStore::new()), clock),
        Arc::new(IngestMetrics::new()),
    )
}

fn delivery(size: u64, tx_byte: u8) -> Vec<u8> {
    let listing = ContentId::new_v4();
    let logs: Vec<_> = (0..size)
        .map(|i| purchase(wallet(0xB0), wallet(0x5E), &listing, i + 1, tx(tx_byte), i))
        .collect();
    block_delivery(&logs)
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("lp-01-content-codec");
    let id = ContentId::new_v4();
    group.bench_function("round_trip", |b| {
        b.iter(|| black_box(from_on_chain(&to_on_chain(black_box(&id)))))
    });
    group.finish();
}

fn bench_decoder(c: &mut Criterion) {
    let mut group = c.benchmark_group("lp-03-event-decoder");
    let decoder = EventDecoder::new();
    let log = purchase(wallet(0xB0), wallet(0x5E), &ContentId::new_v4(), 1, tx(1), 0);
    group.bench_function("decode_purchase", |b| {
        b.iter(|| black_box(decoder.decode(black_box(&log))))
    });
    group.finish();
}

fn bench_normalizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lp-04-normalizer");
    for size in [1u64, 10, 100] {
        let body = delivery(size, 1);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("block_envelope", size), &body, |b, body| {
            b.iter(|| black_box(normalize(body)))
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("lp-07-pipeline");
    group.measurement_time(Duration::from_secs(5));

    for size in [1u64, 10, 100] {
        let body = delivery(size, 2);
        let signature = sign_message_hex(&body, WEBHOOK_SECRET);
        let request = WebhookRequest {
            body: &body,
            signature: Some(&signature),
            timestamp: None,
        };
        group.throughput(Throughput::Elements(size));

        group.bench_function(BenchmarkId::new("fresh_delivery", size), |b| {
            b.iter_batched(
                pipeline,
                |pipeline| black_box(pipeline.process(request)),
                BatchSize::SmallInput,
            )
        });

        let warmed = pipeline();
        let _ = warmed.process(request);
        group.bench_function(BenchmarkId::new("replayed_delivery", size), |b| {
            b.iter(|| black_box(warmed.process(request)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codec, bench_decoder, bench_normalizer, bench_pipeline);
criterion_main!(benches);
