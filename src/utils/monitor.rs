use crate::domain::model::MemorySnapshot;
use crate::utils::alloc;
use std::sync::Mutex;
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Reads memory counters for the current process.
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl SystemMonitor {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!("Cannot resolve current PID, rss will read as 0: {}", e);
                None
            }
        };

        Self {
            system: Mutex::new(System::new()),
            pid,
        }
    }

    /// Resident set size in bytes, 0 when the OS does not report it.
    pub fn resident_bytes(&self) -> u64 {
        let Some(pid) = self.pid else {
            return 0;
        };
        let Ok(mut system) = self.system.lock() else {
            return 0;
        };

        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system.process(pid).map(|p| p.memory()).unwrap_or(0)
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        let heap_used = alloc::live_bytes() as u64;
        let heap_total = (alloc::peak_bytes() as u64).max(heap_used);
        let rss = self.resident_bytes();

        MemorySnapshot {
            external: rss.saturating_sub(heap_used),
            heap_total,
            heap_used,
            rss,
        }
    }

    pub fn log_stats(&self, phase: &str) {
        let stats = self.snapshot();
        tracing::debug!(
            "📊 {} - RSS: {}MB, Heap: {}MB used / {}MB peak",
            phase,
            stats.rss / 1024 / 1024,
            stats.heap_used / 1024 / 1024,
            stats.heap_total / 1024 / 1024
        );
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_consistent() {
        let monitor = SystemMonitor::new();
        let stats = monitor.snapshot();
        assert!(stats.heap_total >= stats.heap_used);
        assert_eq!(stats.external, stats.rss.saturating_sub(stats.heap_used));
    }
}
