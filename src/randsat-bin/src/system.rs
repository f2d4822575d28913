//! CPU-time measurement, used to report solve times and to enforce `--cpu-lim`.

use cpu_time::ProcessTime;

pub struct ResourceMeasure {
    start: ProcessTime,
}

impl ResourceMeasure {
    pub fn new() -> Self {
        Self {
            start: ProcessTime::now(),
        }
    }

    /// CPU seconds consumed by this process since `new` was called.
    pub fn cpu_time(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
