#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// One reading of this process.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSample {
    pub cpu_usage: f32,
    pub memory_mb: u64,
}

/// Samples this process's CPU and memory between parse phases when enabled.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            sysinfo::get_current_pid()
                .inspect_err(|e| tracing::warn!("Process monitoring unavailable: {}", e))
                .ok()
        } else {
            None
        };

        Self {
            system: Mutex::new(System::new()),
            pid,
            enabled: pid.is_some(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn sample(&self) -> Option<ProcessSample> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let process = system.process(pid)?;
        Some(ProcessSample {
            cpu_usage: process.cpu_usage(),
            memory_mb: process.memory() / 1024 / 1024,
        })
    }

    /// Starts timing one parse of `source`.
    pub fn start(&self, source: &str) -> ParseTrace<'_> {
        let now = Instant::now();
        let mut trace = ParseTrace {
            monitor: self,
            source: source.to_string(),
            started: now,
            last_phase: now,
            peak_memory_mb: 0,
        };
        trace.record_peak();
        trace
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Phase timings of a single parse.
#[cfg(feature = "cli")]
pub struct ParseTrace<'a> {
    monitor: &'a SystemMonitor,
    source: String,
    started: Instant,
    last_phase: Instant,
    peak_memory_mb: u64,
}

#[cfg(feature = "cli")]
impl ParseTrace<'_> {
    fn record_peak(&mut self) -> Option<ProcessSample> {
        let sample = self.monitor.sample()?;
        self.peak_memory_mb = self.peak_memory_mb.max(sample.memory_mb);
        Some(sample)
    }

    /// Logs the time spent since the previous phase.
    pub fn phase(&mut self, name: &str) -> Duration {
        let now = Instant::now();
        let spent = now - self.last_phase;
        self.last_phase = now;

        if let Some(sample) = self.record_peak() {
            tracing::info!(
                "📊 {} [{}] - {:?}, CPU: {:.1}%, Memory: {}MB",
                name,
                self.source,
                spent,
                sample.cpu_usage,
                sample.memory_mb
            );
        }
        spent
    }

    pub fn finish(mut self, modules: usize) -> Duration {
        self.record_peak();
        let total = self.started.elapsed();
        if self.monitor.is_enabled() {
            tracing::info!(
                "📊 Parsed {} modules from {} in {:?}, peak memory {}MB",
                modules,
                self.source,
                total,
                self.peak_memory_mb
            );
        }
        total
    }
}

// Library builds without the cli feature carry no sysinfo.
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
pub struct ParseTrace;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn start(&self, _source: &str) -> ParseTrace {
        ParseTrace
    }
}

#[cfg(not(feature = "cli"))]
impl ParseTrace {
    pub fn phase(&mut self, _name: &str) -> std::time::Duration {
        std::time::Duration::ZERO
    }

    pub fn finish(self, _modules: usize) -> std::time::Duration {
        std::time::Duration::ZERO
    }
}
