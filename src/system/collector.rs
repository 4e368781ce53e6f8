use super::cpu::CpuEstimator;
use super::reader;
use super::registry::ProcessRegistry;
use super::snapshot::SystemSnapshot;
use super::source::{CpuCounters, DataSource, SystemIdentity};

/// Owns a data source plus the estimator state that has to survive between
/// refreshes, and produces one [`SystemSnapshot`] per call to `refresh`.
pub struct Collector<S> {
    source: S,
    identity: SystemIdentity,
    cpu: CpuEstimator,
    cores: Vec<CpuEstimator>,
    registry: ProcessRegistry,
    process_limit: Option<usize>,
}

impl<S: DataSource> Collector<S> {
    pub fn new(source: S) -> Self {
        let identity = reader::read_identity(&source);
        let registry = ProcessRegistry::new(&source);
        tracing::info!(
            kernel = %identity.kernel,
            os = %identity.os_name,
            ticks_per_second = registry.ticks_per_second(),
            "collector started"
        );
        Collector {
            source,
            identity,
            cpu: CpuEstimator::new(),
            cores: Vec::new(),
            registry,
            process_limit: None,
        }
    }

    /// Keep only the top `limit` processes in each snapshot.
    pub fn with_process_limit(mut self, limit: Option<usize>) -> Self {
        self.process_limit = limit;
        self
    }

    pub fn identity(&self) -> &SystemIdentity {
        &self.identity
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn refresh(&mut self) -> SystemSnapshot {
        let _refresh_span = tracing::debug_span!("collector.refresh").entered();

        let uptime_seconds = reader::read_uptime(&self.source);
        let memory_utilization = reader::read_memory_utilization(&self.source);
        let kernel = reader::read_kernel_sample(&self.source);
        let cpu_utilization = self.cpu.update_counters(&kernel.cpu);
        let core_utilization = self.refresh_cores(&kernel.cores);
        let counts = kernel.counts;

        let live_pids = reader::read_live_pids(&self.source);
        let processes =
            self.registry
                .refresh(&self.source, &live_pids, uptime_seconds, self.process_limit);

        SystemSnapshot {
            kernel: self.identity.kernel.clone(),
            os_name: self.identity.os_name.clone(),
            uptime_seconds,
            memory_utilization,
            cpu_utilization,
            core_utilization,
            total_processes: counts.total,
            running_processes: counts.running,
            processes,
        }
    }

    fn refresh_cores(&mut self, counters: &[CpuCounters]) -> Vec<f32> {
        if counters.len() != self.cores.len() {
            // CPU set changed (hotplug, or first refresh): every core needs a fresh baseline.
            if !self.cores.is_empty() {
                tracing::info!(
                    before = self.cores.len(),
                    after = counters.len(),
                    "cpu core count changed"
                );
            }
            self.cores = vec![CpuEstimator::new(); counters.len()];
        }
        self.cores
            .iter_mut()
            .zip(counters)
            .map(|(estimator, core)| estimator.update_counters(core))
            .collect()
    }
}
