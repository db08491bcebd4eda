use std::time::{Duration, Instant};

use cpu_time::ProcessTime;

/// Where elapsed time comes from.
///
/// Process CPU time when the platform reports it, wall time otherwise.
#[derive(Debug, Clone, Copy)]
enum Clock {
    Cpu(ProcessTime),
    Wall(Instant),
}

impl Clock {
    fn start() -> Self {
        match ProcessTime::try_now() {
            Ok(now) => Clock::Cpu(now),
            Err(_) => Clock::Wall(Instant::now()),
        }
    }

    fn elapsed(&self) -> Duration {
        match self {
            Clock::Cpu(started) => started.try_elapsed().unwrap_or_default(),
            Clock::Wall(started) => started.elapsed(),
        }
    }
}

/// Cooperative node and CPU time budget for one top-level search.
///
/// The search polls it: [`Limits::admit_node`] once per recursive entry and
/// [`Limits::check_time`] after each recursive return. Once either limit
/// fires the abort flag stays set until the next restart round (node part)
/// or a fresh `Limits` (time part).
#[derive(Debug, Clone)]
pub struct Limits {
    /// Largest node count allowed; 0 means unlimited.
    node_limit: u64,
    time_limit: Option<Duration>,
    started: Clock,
    node_abort: bool,
    time_abort: bool,
}

impl Limits {
    pub fn new(node_limit: u64, time_limit: Option<Duration>) -> Self {
        Limits {
            node_limit,
            time_limit,
            started: Clock::start(),
            node_abort: false,
            time_abort: false,
        }
    }

    pub fn unlimited() -> Self {
        Limits::new(0, None)
    }

    /// Record that the search has expanded `nodes` nodes so far.
    ///
    /// Returns false, and sets the abort flag, once the count exceeds the
    /// node limit.
    pub fn admit_node(&mut self, nodes: u64) -> bool {
        if self.node_limit > 0 && nodes > self.node_limit {
            self.node_abort = true;
            return false;
        }
        true
    }

    /// True once the time limit has passed. Sticky.
    pub fn check_time(&mut self) -> bool {
        if !self.time_abort {
            if let Some(limit) = self.time_limit {
                self.time_abort = self.started.elapsed() >= limit;
            }
        }
        self.time_abort
    }

    pub fn is_aborted(&self) -> bool {
        self.node_abort || self.time_abort
    }

    pub fn node_aborted(&self) -> bool {
        self.node_abort
    }

    /// Start a restart round with a fresh node budget.
    ///
    /// The time limit keeps running from the original start.
    pub fn start_round(&mut self, node_limit: u64) {
        self.node_limit = node_limit;
        self.node_abort = false;
    }

    /// CPU time used by the process since this budget was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn hit_time_limit(&self) -> bool {
        self.time_abort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_limit_exceeded() {
        let mut limits = Limits::new(3, None);
        assert!(limits.admit_node(1));
        assert!(limits.admit_node(3));
        assert!(!limits.is_aborted());
        assert!(!limits.admit_node(4));
        assert!(limits.is_aborted());
        assert!(limits.node_aborted());
        assert!(!limits.hit_time_limit());
    }

    #[test]
    fn test_zero_means_unlimited() {
        let mut limits = Limits::unlimited();
        assert!(limits.admit_node(u64::MAX));
        assert!(!limits.check_time());
        assert!(!limits.is_aborted());
    }

    #[test]
    fn test_round_clears_node_abort_only() {
        let mut limits = Limits::new(1, Some(Duration::ZERO));
        assert!(!limits.admit_node(2));
        assert!(limits.check_time());
        limits.start_round(10);
        assert!(!limits.node_aborted());
        assert!(limits.is_aborted());
        assert!(limits.admit_node(10));
        assert!(!limits.admit_node(11));
    }

    #[test]
    fn test_elapsed_counts_cpu_work() {
        let limits = Limits::new(0, Some(Duration::from_secs(3600)));
        let mut acc = 0u64;
        for i in 0..2_000_000u64 {
            acc = acc.wrapping_mul(31).wrapping_add(i);
        }
        std::hint::black_box(acc);
        assert!(limits.elapsed() > Duration::ZERO);
        assert!(limits.elapsed() < Duration::from_secs(3600));
    }
}
