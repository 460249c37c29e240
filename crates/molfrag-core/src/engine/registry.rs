//! Single-flight coordination for concurrent builds of the same cache
//! key.
//!
//! The on-disk existence check is advisory only; without coordination,
//! two concurrent builds for one key would both observe "absent" and
//! both run the full fan-out. The registry keeps an in-memory map from
//! cache key to an in-progress gate: the first caller becomes the
//! leader and runs the build, later callers wait for the gate and then
//! re-read the cache. A leader that fails still opens the gate, so
//! waiters wake up and may retry as new leaders.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

/// The completion signal a leader opens when its build ends. Opaque to
/// callers; followers wait on it through [`BuildRegistry::wait`].
#[derive(Debug, Default)]
pub struct Gate {
    done: Mutex<bool>,
    opened: Condvar,
}

impl Gate {
    fn wait(&self) {
        let mut done = self.done.lock().unwrap_or_else(|e| e.into_inner());
        while !*done {
            done = self
                .opened
                .wait(done)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    fn open(&self) {
        let mut done = self.done.lock().unwrap_or_else(|e| e.into_inner());
        *done = true;
        self.opened.notify_all();
    }
}

/// The role this caller plays for a given key.
#[derive(Debug)]
pub enum Flight {
    /// This caller runs the build and must call
    /// [`BuildRegistry::finish`] on every exit path.
    Leader,
    /// Another caller is already building this key.
    Follower(Arc<Gate>),
}

#[derive(Debug, Default)]
pub struct BuildRegistry {
    inflight: Mutex<HashMap<String, Arc<Gate>>>,
}

impl BuildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the flight for `key`: the first caller becomes the leader,
    /// everyone else a follower of the leader's gate.
    pub fn begin(&self, key: &str) -> Flight {
        let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
        match inflight.get(key) {
            Some(gate) => Flight::Follower(Arc::clone(gate)),
            None => {
                inflight.insert(key.to_string(), Arc::new(Gate::default()));
                Flight::Leader
            }
        }
    }

    /// Ends the leader's flight for `key` and wakes all followers.
    pub fn finish(&self, key: &str) {
        let gate = {
            let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
            inflight.remove(key)
        };
        if let Some(gate) = gate {
            gate.open();
        }
    }

    /// Blocks until the leader for this gate has finished.
    pub fn wait(&self, flight: &Flight) {
        if let Flight::Follower(gate) = flight {
            gate.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn first_caller_leads_and_later_callers_follow() {
        let registry = BuildRegistry::new();
        assert!(matches!(registry.begin("k"), Flight::Leader));
        assert!(matches!(registry.begin("k"), Flight::Follower(_)));
        registry.finish("k");
        // Once finished, the next caller leads again.
        assert!(matches!(registry.begin("k"), Flight::Leader));
    }

    #[test]
    fn keys_do_not_interfere() {
        let registry = BuildRegistry::new();
        assert!(matches!(registry.begin("a"), Flight::Leader));
        assert!(matches!(registry.begin("b"), Flight::Leader));
    }

    #[test]
    fn followers_wake_when_the_leader_finishes() {
        let registry = Arc::new(BuildRegistry::new());
        assert!(matches!(registry.begin("k"), Flight::Leader));

        let woken = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            let woken = Arc::clone(&woken);
            handles.push(thread::spawn(move || {
                let flight = registry.begin("k");
                registry.wait(&flight);
                woken.fetch_add(1, Ordering::SeqCst);
            }));
        }

        thread::sleep(Duration::from_millis(50));
        assert_eq!(woken.load(Ordering::SeqCst), 0);

        registry.finish("k");
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(woken.load(Ordering::SeqCst), 4);
    }
}
