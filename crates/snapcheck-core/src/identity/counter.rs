//! Per-function ordinal assignment for unnamed snapshots.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::identity::call_site::CallSite;

/// Structural key of one counter bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSiteKey {
    pub file_id: String,
    pub file_path: PathBuf,
    pub function: String,
}

impl From<&CallSite> for CallSiteKey {
    fn from(site: &CallSite) -> Self {
        Self {
            file_id: site.file_id.clone(),
            file_path: site.file_path.clone(),
            function: site.function.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Process-wide ordinal counters
///
/// Each unnamed resolution appends its position to the bucket of its
/// function and receives the bucket's new length, so ordinals start at 1,
/// strictly increase and are never reused until a reset.
#[derive(Debug, Default)]
pub struct CounterRegistry {
    buckets: Mutex<HashMap<CallSiteKey, Vec<Position>>>,
}

static GLOBAL: OnceLock<Arc<CounterRegistry>> = OnceLock::new();

impl CounterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every engine that was not given its own
    pub fn global() -> Arc<CounterRegistry> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(CounterRegistry::new())))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CallSiteKey, Vec<Position>>> {
        // A panicking test must not take every later assertion down with it.
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one more resolution at `site` and return its ordinal
    pub fn next_ordinal(&self, site: &CallSite) -> u32 {
        let key = CallSiteKey::from(site);
        let position = Position {
            line: site.line,
            column: site.column,
        };
        let mut buckets = self.lock();
        let bucket = buckets.entry(key).or_default();
        bucket.push(position);
        u32::try_from(bucket.len()).unwrap_or(u32::MAX)
    }

    /// Positions observed for one function, in resolution order
    pub fn observed(&self, key: &CallSiteKey) -> Vec<Position> {
        self.lock().get(key).cloned().unwrap_or_default()
    }

    pub fn reset(&self) {
        self.lock().clear();
    }

    pub fn reset_function(&self, key: &CallSiteKey) {
        self.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(function: &str, line: u32) -> CallSite {
        CallSite::new("krate::tests", "/src/tests.rs", function, line, 9)
    }

    #[test]
    fn test_loop_yields_sequential_ordinals() {
        let registry = CounterRegistry::new();
        let ordinals: Vec<u32> = (0..5).map(|_| registry.next_ordinal(&site("f", 10))).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_distinct_positions_share_function_sequence() {
        let registry = CounterRegistry::new();
        assert_eq!(registry.next_ordinal(&site("f", 10)), 1);
        assert_eq!(registry.next_ordinal(&site("f", 20)), 2);
        assert_eq!(registry.next_ordinal(&site("g", 10)), 1);

        let observed = registry.observed(&CallSiteKey::from(&site("f", 0)));
        let lines: Vec<u32> = observed.iter().map(|p| p.line).collect();
        assert_eq!(lines, vec![10, 20]);
    }

    #[test]
    fn test_reset_function_only_clears_one_bucket() {
        let registry = CounterRegistry::new();
        registry.next_ordinal(&site("f", 1));
        registry.next_ordinal(&site("g", 1));

        registry.reset_function(&CallSiteKey::from(&site("f", 1)));
        assert_eq!(registry.next_ordinal(&site("f", 1)), 1);
        assert_eq!(registry.next_ordinal(&site("g", 1)), 2);

        registry.reset();
        assert_eq!(registry.next_ordinal(&site("g", 1)), 1);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(Arc::ptr_eq(&CounterRegistry::global(), &CounterRegistry::global()));
    }
}
