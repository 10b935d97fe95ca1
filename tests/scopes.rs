use ferrous_scope::{
    DiError, DiResult, Dispose, LifetimeScope, ProviderOptions, Resolver, ScopeFactory, ScopedResolver,
    ServiceCollection,
};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct RequestContext {
    id: String,
}

fn counted_requests() -> ServiceCollection {
    let counter = Arc::new(Mutex::new(0));

    let mut sc = ServiceCollection::new();
    sc.add_scoped_factory::<RequestContext, _>(move |_| {
        let mut c = counter.lock().unwrap();
        *c += 1;
        Ok(RequestContext { id: format!("req-{}", *c) })
    });
    sc
}

#[test]
fn test_scoped_lifetime() {
    let sp = counted_requests().build();

    let scope1 = sp.create_scope();
    let scope2 = sp.create_scope();

    let ctx1a = scope1.get::<RequestContext>().unwrap();
    let ctx1b = scope1.get::<RequestContext>().unwrap();
    let ctx2a = scope2.get::<RequestContext>().unwrap();

    // Same instance within a scope, different across scopes
    assert!(Arc::ptr_eq(&ctx1a, &ctx1b));
    assert!(!Arc::ptr_eq(&ctx1a, &ctx2a));
    assert_eq!(ctx1a.id, "req-1");
    assert_eq!(ctx2a.id, "req-2");
}

#[test]
fn test_root_acts_as_scope_by_default() {
    let sp = counted_requests().build();

    let a = sp.get::<RequestContext>().unwrap();
    let b = sp.get::<RequestContext>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    // A child scope still gets its own instance.
    let scope = sp.create_scope();
    let c = scope.get::<RequestContext>().unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(c.id, "req-2");
}

#[test]
fn test_cannot_resolve_scoped_from_root_when_validating() {
    let sp = counted_requests().build_with_options(ProviderOptions {
        validate_scopes: true,
        ..ProviderOptions::default()
    });

    match sp.get::<RequestContext>() {
        Err(DiError::WrongLifetime(msg)) => assert!(msg.contains("scoped")),
        other => panic!("expected WrongLifetime, got {:?}", other.map(|_| ())),
    }

    // Child scopes are unaffected.
    let scope = sp.create_scope();
    assert!(scope.get::<RequestContext>().is_ok());
}

#[test]
fn test_validated_singleton_cannot_capture_scoped() {
    struct Cache {
        _ctx: Arc<RequestContext>,
    }

    let mut sc = counted_requests();
    sc.add_singleton_factory::<Cache, _>(|r| Ok(Cache { _ctx: r.get::<RequestContext>()? }));
    let sp = sc.build_with_options(ProviderOptions {
        validate_scopes: true,
        ..ProviderOptions::default()
    });

    let resolver = ScopedResolver::new(sp);
    assert!(matches!(
        resolver.resolve::<Cache>(),
        Err(DiError::WrongLifetime(_))
    ));
    assert_eq!(resolver.container().scope_stats().open(), 0);
}

#[test]
fn test_disposable_transients_at_root() {
    struct Temp;

    impl Dispose for Temp {
        fn dispose(&self) -> DiResult<()> {
            Ok(())
        }
    }

    let mut sc = ServiceCollection::new();
    sc.add_transient_disposable::<Temp, _>(|_| Ok(Temp));
    sc.add_transient_factory::<u32, _>(|_| Ok(5));
    let sp = sc.build_with_options(ProviderOptions {
        validate_scopes: true,
        ..ProviderOptions::default()
    });

    assert!(matches!(sp.get::<Temp>(), Err(DiError::WrongLifetime(_))));
    // Plain transients are still fine at the root.
    assert_eq!(*sp.get::<u32>().unwrap(), 5);

    // Through a scope the disposer goes with the scope.
    let resolver = ScopedResolver::new(sp);
    let temp = resolver.resolve::<Temp>().unwrap();
    temp.release().unwrap();
    assert_eq!(resolver.container().scope_stats().open(), 0);
}

#[test]
fn test_get_optional() {
    struct Missing;
    struct Wrapper {
        inner: Option<Arc<Missing>>,
    }

    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<Wrapper, _>(|r| Ok(Wrapper { inner: r.get_optional::<Missing>()? }));

    let sp = sc.build();
    let scope = sp.create_scope();
    let wrapper = scope.get::<Wrapper>().unwrap();
    assert!(wrapper.inner.is_none());
    assert!(scope.get_optional::<String>().unwrap().is_none());
}

#[test]
fn test_capability_traits_on_reference_container() {
    let sp = counted_requests().build();

    let scope = ScopeFactory::create_scope(&sp);
    let ctx = scope.resolve_required::<RequestContext>().unwrap();
    assert_eq!(ctx.id, "req-1");

    LifetimeScope::dispose(&scope).unwrap();
    LifetimeScope::dispose(&scope).unwrap();
    assert!(scope.is_disposed());
    assert_eq!(sp.scope_stats().disposed, 1);
    assert_eq!(
        scope.resolve_required::<RequestContext>().unwrap_err(),
        DiError::ScopeDisposed
    );
}
