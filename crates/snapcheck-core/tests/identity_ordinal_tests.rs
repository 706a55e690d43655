#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::sync::{Arc, Barrier};
use std::thread;

use snapcheck_core::identity::{CallSite, CallSiteKey, CounterRegistry, IdentityResolver};

fn site(function: &str) -> CallSite {
    CallSite::new(
        "snapcheck_core::ordinal_tests",
        "/work/tests/ordinal_tests.rs",
        function,
        42,
        13,
    )
}

#[test]
fn test_loop_at_one_site_yields_one_to_n() {
    // Given a fresh registry
    let resolver = IdentityResolver::new(Arc::new(CounterRegistry::new()));

    // When the same site resolves ten times in a loop
    let names: Vec<String> = (0..10)
        .map(|_| resolver.resolve(&site("renders_rows"), None, Some("txt"), None).base_name)
        .collect();

    // Then the ordinals are 1..=10 in call order
    let expected: Vec<String> = (1..=10).map(|i| format!("renders_rows.{}", i)).collect();
    assert_eq!(names, expected);
}

#[test]
fn test_concurrent_resolution_assigns_each_ordinal_once() {
    const THREADS: usize = 16;
    const PER_THREAD: usize = 25;

    // Given many threads released at the same moment
    let registry = Arc::new(CounterRegistry::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..PER_THREAD)
                    .map(|_| registry.next_ordinal(&site("stress")))
                    .collect::<Vec<u32>>()
            })
        })
        .collect();

    // When every thread resolves the same call site
    let mut all = Vec::new();
    for handle in handles {
        let ordinals = handle.join().unwrap();
        // Then each thread sees strictly increasing ordinals
        assert!(ordinals.windows(2).all(|w| w[0] < w[1]));
        all.extend(ordinals);
    }

    // And together they cover 1..=N exactly once
    let total = THREADS * PER_THREAD;
    let unique: BTreeSet<u32> = all.iter().copied().collect();
    assert_eq!(all.len(), total);
    assert_eq!(unique, (1..=total as u32).collect::<BTreeSet<u32>>());
    assert_eq!(
        registry.observed(&CallSiteKey::from(&site("stress"))).len(),
        total
    );
}

#[test]
fn test_functions_count_independently() {
    let resolver = IdentityResolver::new(Arc::new(CounterRegistry::new()));

    let a = resolver.resolve(&site("first"), None, None, None);
    let b = resolver.resolve(&site("second"), None, None, None);
    let c = resolver.resolve(&site("first"), None, None, None);

    assert_eq!(a.base_name, "first.1");
    assert_eq!(b.base_name, "second.1");
    assert_eq!(c.base_name, "first.2");
}

#[test]
fn test_reset_restarts_numbering() {
    let registry = Arc::new(CounterRegistry::new());
    let resolver = IdentityResolver::new(Arc::clone(&registry));

    resolver.resolve(&site("again"), None, None, None);
    registry.reset();

    assert_eq!(
        resolver.resolve(&site("again"), None, None, None).base_name,
        "again.1"
    );
}
