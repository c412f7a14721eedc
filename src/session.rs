use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, PoisonError,
};

use log::debug;

/// Identifies one generation request. Later requests get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Last write wins holder for results of overlapping generation requests.
///
/// A result is published only if no newer request has published already, so a slow stale
/// request can never replace the output of a newer one.
#[derive(Debug)]
pub struct Session<T> {
    next: AtomicU64,
    latest: Mutex<Option<(Ticket, Arc<T>)>>,
}

impl<T> Default for Session<T> {
    fn default() -> Self {
        Self { next: AtomicU64::new(0), latest: Mutex::new(None) }
    }
}

impl<T> Session<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.next.fetch_add(1, Ordering::SeqCst))
    }

    /// Publishes the result, returning whether it was accepted.
    pub fn submit(&self, ticket: Ticket, result: T) -> bool {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(&*latest, Some((t, _)) if *t > ticket) {
            debug!("Dropping stale result {ticket:?}");
            return false;
        }
        *latest = Some((ticket, Arc::new(result)));
        true
    }

    pub fn latest(&self) -> Option<Arc<T>> {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.as_ref().map(|(_, r)| Arc::clone(r))
    }

    /// Whether a request newer than `ticket` has started.
    pub fn is_superseded(&self, ticket: Ticket) -> bool {
        self.next.load(Ordering::SeqCst) > ticket.0 + 1
    }
}

#[cfg(test)]
mod session_tests {
    use std::sync::Arc;
    use std::thread;

    use super::Session;

    #[test]
    fn test_tickets_increase() {
        let s = Session::<u8>::new();
        let a = s.begin();
        let b = s.begin();
        assert!(b > a);
        assert!(s.is_superseded(a));
        assert!(!s.is_superseded(b));
    }

    #[test]
    fn test_stale_result_dropped() {
        let s = Session::new();
        let old = s.begin();
        let new = s.begin();
        assert!(s.submit(new, "new"));
        assert!(!s.submit(old, "old"));
        assert_eq!(*s.latest().unwrap(), "new");
    }

    #[test]
    fn test_in_order_results() {
        let s = Session::new();
        assert!(s.latest().is_none());
        let a = s.begin();
        assert!(s.submit(a, 1));
        let b = s.begin();
        assert!(s.submit(b, 2));
        assert_eq!(*s.latest().unwrap(), 2);
    }

    #[test]
    fn test_concurrent_submits_keep_newest() {
        let s = Arc::new(Session::new());
        let tickets = (0..16).map(|_| s.begin()).collect::<Vec<_>>();
        let newest = tickets[15];
        let handles = tickets
            .into_iter()
            .rev()
            .map(|t| {
                let s = Arc::clone(&s);
                thread::spawn(move || s.submit(t, t))
            })
            .collect::<Vec<_>>();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*s.latest().unwrap(), newest);
    }
}
