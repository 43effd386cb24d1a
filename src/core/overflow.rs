//! Overflow resolution — find the nearest scrollable ancestor of an
//! element, memoized in a time-bounded cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::host::{ElementId, HostPage};

/// How long cached answers survive.  The page mutates underneath us, so
/// the whole cache is dropped once per interval rather than invalidated
/// entry by entry.
pub const CACHE_CLEAR_INTERVAL: Duration = Duration::from_secs(10);

/// Resolver with its memoized ancestor answers.
///
/// Every element visited on the way to an answer is backfilled with that
/// answer ("no scrollable ancestor" included), so repeated lookups across
/// a subtree are O(1) until the next clear.
#[derive(Debug, Default)]
pub struct OverflowResolver {
    cache: HashMap<ElementId, Option<ElementId>>,
    last_clear: Option<Instant>,
}

impl OverflowResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nearest ancestor of `el` (inclusive) whose content exceeds its
    /// visible box and whose `overflow-y` permits scrolling.  `None` means
    /// the caller should leave default scrolling alone.
    pub fn resolve<H: HostPage>(
        &mut self,
        host: &H,
        el: ElementId,
        now: Instant,
    ) -> Option<ElementId> {
        self.expire(now);

        let mut visited = Vec::new();
        let mut current = Some(el);
        while let Some(cur) = current {
            if let Some(&answer) = self.cache.get(&cur) {
                return self.backfill(&visited, answer);
            }
            visited.push(cur);
            if host.client_height(cur) < host.scroll_height(cur)
                && host.overflow_y(cur).is_scrollable()
            {
                return self.backfill(&visited, Some(cur));
            }
            current = host.parent(cur);
        }
        self.backfill(&visited, None)
    }

    /// Drop all cached answers immediately.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.last_clear = None;
    }

    fn backfill(&mut self, visited: &[ElementId], answer: Option<ElementId>) -> Option<ElementId> {
        for &el in visited {
            self.cache.insert(el, answer);
        }
        answer
    }

    fn expire(&mut self, now: Instant) {
        match self.last_clear {
            None => self.last_clear = Some(now),
            Some(at) if now.saturating_duration_since(at) >= CACHE_CLEAR_INTERVAL => {
                self.cache.clear();
                self.last_clear = Some(now);
            }
            Some(_) => {}
        }
    }
}
