/// Property-based tests for scoped resolution
///
/// These tests verify that handle and scope bookkeeping holds regardless of
/// how many resolutions and releases a caller performs.

use ferrous_scope::{DiResult, Dispose, Lifetime, ScopedResolver, ServiceCollection};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Payload {
    value: String,
}

struct Counted(Arc<AtomicUsize>);

impl Dispose for Counted {
    fn dispose(&self) -> DiResult<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn lifetime_strategy() -> impl Strategy<Value = Lifetime> {
    prop_oneof![
        Just(Lifetime::Singleton),
        Just(Lifetime::Scoped),
        Just(Lifetime::Transient),
    ]
}

// Property: only singletons are shared between independent handles
proptest! {
    #[test]
    fn sharing_follows_lifetime(lifetime in lifetime_strategy(), value in "\\PC{0,32}", calls in 2usize..8) {
        let mut services = ServiceCollection::new();
        let v = value.clone();
        services.add_factory::<Payload, _>(lifetime, move |_| Ok(Payload { value: v.clone() }));

        let resolver = ScopedResolver::new(services.build());
        let handles: Vec<_> = (0..calls).map(|_| resolver.resolve::<Payload>().unwrap()).collect();

        for pair in handles.windows(2) {
            let shared = Arc::ptr_eq(pair[0].service(), pair[1].service());
            prop_assert_eq!(shared, lifetime == Lifetime::Singleton);
        }
        for handle in &handles {
            prop_assert_eq!(&handle.value, &value);
        }
        prop_assert_eq!(resolver.container().scope_stats().open(), calls);
    }
}

// Property: any number of releases disposes the scope exactly once
proptest! {
    #[test]
    fn repeated_release_disposes_once(releases in 1usize..16, drop_after in any::<bool>()) {
        let disposed = Arc::new(AtomicUsize::new(0));
        let counter = disposed.clone();

        let mut services = ServiceCollection::new();
        services.add_scoped_disposable::<Counted, _>(move |_| Ok(Counted(counter.clone())));

        let resolver = ScopedResolver::new(services.build());
        let handle = resolver.resolve::<Counted>().unwrap();
        for _ in 0..releases {
            prop_assert!(handle.release().is_ok());
        }
        if drop_after {
            drop(handle);
        }

        prop_assert_eq!(disposed.load(Ordering::SeqCst), 1);
        prop_assert_eq!(resolver.container().scope_stats().disposed, 1);
    }
}

// Property: failed resolutions never leave scopes open
proptest! {
    #[test]
    fn failures_never_leak(attempts in 1usize..20, register in any::<bool>()) {
        let mut services = ServiceCollection::new();
        if register {
            services.add_scoped_factory::<Payload, _>(|_| Ok(Payload { value: String::new() }));
        }

        let resolver = ScopedResolver::new(services.build());
        for _ in 0..attempts {
            let result = resolver.resolve::<Payload>();
            prop_assert_eq!(result.is_ok(), register);
        }
        prop_assert_eq!(resolver.container().scope_stats().open(), 0);
    }
}
