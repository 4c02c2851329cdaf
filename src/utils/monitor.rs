#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::Instant;
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

/// Logs this process's resource usage alongside the pipeline stages, so a
/// run against the full national tables shows where the memory goes.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    sampler: Option<Mutex<Sampler>>,
    started: Instant,
}

#[cfg(feature = "cli")]
struct Sampler {
    system: System,
    pid: Pid,
    peak_memory_mb: u64,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let sampler = match (enabled, sysinfo::get_current_pid()) {
            (true, Ok(pid)) => {
                let mut system = System::new_with_specifics(RefreshKind::everything());
                system.refresh_all();
                Some(Mutex::new(Sampler {
                    system,
                    pid,
                    peak_memory_mb: 0,
                }))
            }
            (true, Err(e)) => {
                tracing::warn!("⚠️ System monitoring unavailable: {}", e);
                None
            }
            (false, _) => None,
        };

        Self {
            sampler,
            started: Instant::now(),
        }
    }

    pub fn log_stats(&self, phase: &str) {
        let Some(lock) = &self.sampler else { return };
        let Ok(mut guard) = lock.lock() else { return };
        let sampler = &mut *guard;

        sampler.system.refresh_all();
        let (cpu_usage, memory_mb) = match sampler.system.process(sampler.pid) {
            Some(process) => (process.cpu_usage(), process.memory() / 1024 / 1024),
            None => return,
        };
        let total_mb = sampler.system.total_memory() / 1024 / 1024;
        let memory_percent = if total_mb > 0 {
            memory_mb as f32 / total_mb as f32 * 100.0
        } else {
            0.0
        };
        sampler.peak_memory_mb = sampler.peak_memory_mb.max(memory_mb);

        tracing::info!(
            "📊 {} - CPU: {:.1}%, Memory: {}MB ({:.1}%), Peak: {}MB, Time: {:?}",
            phase,
            cpu_usage,
            memory_mb,
            memory_percent,
            sampler.peak_memory_mb,
            self.started.elapsed()
        );
    }

    pub fn log_final_stats(&self) {
        let Some(lock) = &self.sampler else { return };
        let Ok(guard) = lock.lock() else { return };

        tracing::info!(
            "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
            self.started.elapsed(),
            guard.peak_memory_mb
        );
    }
}

// No-op implementation when the cli feature is disabled
#[cfg(not(feature = "cli"))]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}
}
