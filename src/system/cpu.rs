use super::source::CpuCounters;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Sample {
    active: u64,
    idle: u64,
}

/// Turns cumulative busy/idle tick counters into a utilization fraction for
/// the interval since the previous call.
///
/// The first call only records a baseline and reports 0, since counters taken
/// since boot would otherwise show the lifetime average as a spike.
#[derive(Clone, Debug, Default)]
pub struct CpuEstimator {
    prev: Option<Sample>,
}

impl CpuEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns utilization in `[0, 1]`.
    pub fn update(&mut self, active: u64, idle: u64) -> f32 {
        let current = Sample { active, idle };
        let Some(prev) = self.prev.replace(current) else {
            return 0.0;
        };

        let delta_active = current.active.saturating_sub(prev.active);
        let delta_idle = current.idle.saturating_sub(prev.idle);
        let delta_total = delta_active.saturating_add(delta_idle);
        if delta_total == 0 {
            return 0.0;
        }
        delta_active as f32 / delta_total as f32
    }

    pub fn update_counters(&mut self, counters: &CpuCounters) -> f32 {
        self.update(counters.active(), counters.idle_total())
    }

    /// Forget the baseline; the next update reports 0 again.
    pub fn reset(&mut self) {
        self.prev = None;
    }

    pub fn is_armed(&self) -> bool {
        self.prev.is_some()
    }
}
