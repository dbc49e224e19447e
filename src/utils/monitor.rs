//! Process resource samples taken at the end of each placement phase.

use serde::Serialize;
use std::fmt;
#[cfg(feature = "cli")]
use std::time::Instant;
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Reading sleeves left by earlier runs.
    Index,
    Scan,
    Placement,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Index => write!(f, "index"),
            RunPhase::Scan => write!(f, "scan"),
            RunPhase::Placement => write!(f, "placement"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSample {
    pub phase: RunPhase,
    pub cpu_usage: f32,
    pub memory_mb: u64,
    /// Since the monitor was created.
    pub elapsed_ms: u64,
}

#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: System,
    pid: Option<Pid>,
    started: Instant,
    samples: Vec<PhaseSample>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let mut system = System::new_with_specifics(RefreshKind::everything());
        if enabled {
            system.refresh_all();
        }

        Self {
            system,
            pid: sysinfo::get_current_pid().ok(),
            started: Instant::now(),
            samples: Vec::new(),
            enabled,
        }
    }

    /// Records and logs usage for `phase`; does nothing when disabled.
    pub fn sample(&mut self, phase: RunPhase) {
        if !self.enabled {
            return;
        }

        self.system.refresh_all();
        let Some(process) = self.pid.and_then(|pid| self.system.process(pid)) else {
            tracing::debug!("No process entry for the placer, {} not sampled", phase);
            return;
        };

        let sample = PhaseSample {
            phase,
            cpu_usage: process.cpu_usage(),
            memory_mb: process.memory() / 1024 / 1024,
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        };
        tracing::info!(
            "📊 {} - CPU: {:.1}%, Memory: {}MB, Elapsed: {}ms",
            phase,
            sample.cpu_usage,
            sample.memory_mb,
            sample.elapsed_ms
        );
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[PhaseSample] {
        &self.samples
    }

    pub fn peak_memory_mb(&self) -> Option<u64> {
        self.samples.iter().map(|s| s.memory_mb).max()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// 非 CLI 環境提供空實現
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn sample(&mut self, _phase: RunPhase) {}

    pub fn samples(&self) -> &[PhaseSample] {
        &[]
    }

    pub fn peak_memory_mb(&self) -> Option<u64> {
        None
    }

    pub fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_records_nothing() {
        let mut monitor = SystemMonitor::new(false);
        monitor.sample(RunPhase::Scan);

        assert!(!monitor.is_enabled());
        assert!(monitor.samples().is_empty());
        assert_eq!(monitor.peak_memory_mb(), None);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_samples_follow_phase_order() {
        let mut monitor = SystemMonitor::new(true);
        monitor.sample(RunPhase::Scan);
        monitor.sample(RunPhase::Placement);

        // a sandbox without a process table yields no samples at all
        let phases: Vec<RunPhase> = monitor.samples().iter().map(|s| s.phase).collect();
        assert!(phases.is_empty() || phases == vec![RunPhase::Scan, RunPhase::Placement]);
        assert!(monitor
            .samples()
            .windows(2)
            .all(|w| w[0].elapsed_ms <= w[1].elapsed_ms));
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(RunPhase::Index.to_string(), "index");
        assert_eq!(serde_json::to_string(&RunPhase::Placement).unwrap(), "\"placement\"");
    }
}
