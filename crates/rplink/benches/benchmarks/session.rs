use criterion::{BatchSize, BenchmarkId, Criterion};

use rplink::Uuid;
use rplink::messages::{Event, ReconcileOperationsMsg};

use crate::utils::{create_session, create_volume_events};

fn bench_apply_operations(c: &mut Criterion) {
    for count in [10, 1_000, 10_000] {
        c.bench_with_input(
            BenchmarkId::new("apply operations", count),
            &count,
            |b, &count| {
                b.iter_batched_ref(
                    || {
                        let (session, receiver) = create_session("disk:100");
                        (session, receiver, create_volume_events(count))
                    },
                    |(session, _receiver, events)| {
                        for event in std::mem::take(events) {
                            session.process_event(event).unwrap();
                        }
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
}

fn bench_reconcile_operations(c: &mut Criterion) {
    for count in [10, 1_000, 10_000] {
        c.bench_with_input(
            BenchmarkId::new("reconcile operations", count),
            &count,
            |b, &count| {
                b.iter_batched_ref(
                    || {
                        let (mut session, receiver) = create_session("disk:100");
                        let mut operation_uuids = Vec::with_capacity(count);
                        for event in create_volume_events(count) {
                            if let Event::ApplyOperation(msg) = &event {
                                operation_uuids.push(msg.operation_uuid);
                            }
                            session.process_event(event).unwrap();
                        }
                        operation_uuids.push(Uuid::random());
                        (session, receiver, operation_uuids)
                    },
                    |(session, _receiver, operation_uuids)| {
                        session
                            .process_event(Event::ReconcileOperations(ReconcileOperationsMsg {
                                operation_uuids: std::mem::take(operation_uuids),
                            }))
                            .unwrap();
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
}

pub fn benchmark(c: &mut Criterion) {
    bench_apply_operations(c);
    bench_reconcile_operations(c);
}
