// Process sampling backed by sysinfo
// Author: Gabriel Demetrios Lafis

use std::time::{Duration, Instant};

use sysinfo::{Pid, ProcessesToUpdate, System, MINIMUM_CPU_UPDATE_INTERVAL};

use super::{MonitorError, Reading, SampleSource};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Rate limit for refreshes that need a minimum gap to be meaningful
#[derive(Debug, Clone)]
pub struct RefreshGate {
    interval: Duration,
    last: Option<Instant>,
}

impl RefreshGate {
    pub fn new(interval: Duration) -> Self {
        RefreshGate { interval, last: None }
    }

    /// Whether a refresh at `now` is far enough from the previous one.
    /// Records `now` as the last refresh when it is.
    pub fn due(&mut self, now: Instant) -> bool {
        let due = match self.last {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}

/// Reads system-wide CPU usage and the resident memory of this process.
///
/// sysinfo computes CPU usage as a delta between two refreshes and leaves it
/// unchanged when they are less than `MINIMUM_CPU_UPDATE_INTERVAL` apart.
/// Samples taken closer together than that repeat the last CPU figure;
/// memory is refreshed on every sample.
pub struct SystemSampler {
    system: System,
    pid: Pid,
    cpu_gate: RefreshGate,
    cpu_percent: f64,
}

impl SystemSampler {
    /// Create a sampler for the current process
    pub fn new() -> Result<Self, MonitorError> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| MonitorError::Unavailable(e.to_string()))?;

        // CPU usage is a delta between refreshes; prime the first reading
        let mut system = System::new();
        system.refresh_cpu_usage();
        let mut cpu_gate = RefreshGate::new(MINIMUM_CPU_UPDATE_INTERVAL);
        cpu_gate.due(Instant::now());

        Ok(SystemSampler {
            system,
            pid,
            cpu_gate,
            cpu_percent: 0.0,
        })
    }
}

impl SampleSource for SystemSampler {
    fn read_usage(&mut self) -> Result<Reading, MonitorError> {
        if self.cpu_gate.due(Instant::now()) {
            self.system.refresh_cpu_usage();
            self.cpu_percent = f64::from(self.system.global_cpu_usage());
        }
        self.system.refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);

        let process = self.system
            .process(self.pid)
            .ok_or_else(|| MonitorError::ProcessNotFound(self.pid.as_u32()))?;

        Ok(Reading {
            cpu_percent: self.cpu_percent,
            memory_mb: process.memory() as f64 / BYTES_PER_MB,
        })
    }
}
