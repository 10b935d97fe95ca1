/// Concurrent access integration tests
///
/// Many threads resolving through one resolver must share singletons, keep
/// scoped instances apart, and close every scope they open.

use crossbeam_utils::thread;
use ferrous_scope::{ScopedResolver, ServiceCollection};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

const THREADS: usize = 8;
const ROUNDS: usize = 50;

struct Registry {
    serial: usize,
}

struct Request {
    registry: Arc<Registry>,
}

#[test]
fn test_concurrent_singleton_identity() {
    let constructed = Arc::new(AtomicUsize::new(0));
    let counter = constructed.clone();

    let mut services = ServiceCollection::new();
    services.add_singleton_factory::<Registry, _>(move |_| {
        Ok(Registry { serial: counter.fetch_add(1, Ordering::SeqCst) })
    });
    services.add_scoped_factory::<Request, _>(|r| Ok(Request { registry: r.get::<Registry>()? }));

    let resolver = ScopedResolver::new(services.build());
    let barrier = Barrier::new(THREADS);

    let pointers: Vec<usize> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let resolver = &resolver;
                let barrier = &barrier;
                s.spawn(move |_| {
                    barrier.wait();
                    let mut seen = Vec::with_capacity(ROUNDS);
                    for _ in 0..ROUNDS {
                        let request = resolver.resolve::<Request>().unwrap();
                        seen.push(Arc::as_ptr(&request.registry) as usize);
                        request.release().unwrap();
                    }
                    seen
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(pointers.len(), THREADS * ROUNDS);
    assert!(pointers.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(constructed.load(Ordering::SeqCst), 1);

    let registry = resolver.resolve::<Registry>().unwrap();
    assert_eq!(registry.serial, 0);
    registry.release().unwrap();

    let stats = resolver.container().scope_stats();
    assert_eq!(stats.created, THREADS * ROUNDS + 1);
    assert_eq!(stats.open(), 0);
}

#[test]
fn test_concurrent_scoped_instances_are_unique() {
    let mut services = ServiceCollection::new();
    services.add_singleton(Registry { serial: 0 });
    services.add_scoped_factory::<Request, _>(|r| Ok(Request { registry: r.get::<Registry>()? }));

    let resolver = ScopedResolver::new(services.build());

    // Hold every handle until the end so no allocation can be reused.
    let handles: Vec<_> = thread::scope(|s| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                let resolver = &resolver;
                s.spawn(move |_| {
                    (0..ROUNDS)
                        .map(|_| resolver.resolve::<Request>().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers.into_iter().flat_map(|w| w.join().unwrap()).collect()
    })
    .unwrap();

    let mut pointers: Vec<usize> = handles
        .iter()
        .map(|h| Arc::as_ptr(h.service()) as usize)
        .collect();
    pointers.sort_unstable();
    pointers.dedup();
    assert_eq!(pointers.len(), THREADS * ROUNDS);
    assert_eq!(resolver.container().scope_stats().open(), THREADS * ROUNDS);

    drop(handles);
    assert_eq!(resolver.container().scope_stats().open(), 0);
}

#[test]
fn test_concurrent_release_claims_once() {
    let mut services = ServiceCollection::new();
    services.add_scoped_factory::<Request, _>(|_| {
        Ok(Request { registry: Arc::new(Registry { serial: 0 }) })
    });

    let resolver = ScopedResolver::new(services.build());
    let handle = resolver.resolve::<Request>().unwrap();
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for _ in 0..THREADS {
            let handle = &handle;
            let barrier = &barrier;
            s.spawn(move |_| {
                barrier.wait();
                handle.release().unwrap();
            });
        }
    })
    .unwrap();

    let stats = resolver.container().scope_stats();
    assert!(handle.is_released());
    assert_eq!(stats.disposed, 1);
}
