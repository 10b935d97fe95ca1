#![no_main]

use ferrous_scope::{DiResult, Dispose, ScopeBoundHandle, ScopedResolver, ServiceCollection, Scope};
use libfuzzer_sys::fuzz_target;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Shared;

struct PerScope {
    _shared: Arc<Shared>,
}

struct Closer(Arc<AtomicUsize>);

impl Dispose for Closer {
    fn dispose(&self) -> DiResult<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Missing;

// Each byte is one operation against a pool of live handles.
fuzz_target!(|data: &[u8]| {
    let closed = Arc::new(AtomicUsize::new(0));
    let counter = closed.clone();

    let mut services = ServiceCollection::new();
    services.add_singleton(Shared);
    services.add_scoped_factory::<PerScope, _>(|r| Ok(PerScope { _shared: r.get::<Shared>()? }));
    services.add_scoped_disposable::<Closer, _>(move |_| Ok(Closer(counter.clone())));

    let resolver = ScopedResolver::new(services.build());
    let mut scoped: Vec<ScopeBoundHandle<PerScope, Scope>> = Vec::new();
    let mut closers: Vec<ScopeBoundHandle<Closer, Scope>> = Vec::new();
    let mut closers_built = 0usize;

    for &op in data {
        let slot = (op >> 3) as usize;
        match op % 6 {
            0 => scoped.push(resolver.resolve::<PerScope>().unwrap()),
            1 => {
                closers.push(resolver.resolve::<Closer>().unwrap());
                closers_built += 1;
            }
            2 if !scoped.is_empty() => {
                let i = slot % scoped.len();
                scoped[i].release().unwrap();
            }
            3 if !closers.is_empty() => {
                let i = slot % closers.len();
                closers[i].release().unwrap();
            }
            4 if !closers.is_empty() => {
                let i = slot % closers.len();
                drop(closers.swap_remove(i));
            }
            5 => assert!(resolver.resolve::<Missing>().is_err()),
            _ => {}
        }
    }

    drop(scoped);
    drop(closers);

    let stats = resolver.container().scope_stats();
    assert_eq!(stats.open(), 0);
    assert_eq!(closed.load(Ordering::SeqCst), closers_built);
});
