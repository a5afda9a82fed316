//! Best-effort process memory and CPU sampling.
//!
//! The driver never touches the platform directly. It asks a
//! [`ResourceProbe`] for raw readings through a [`Sampler`], which turns
//! them into [`Sample`]s and decides, once per execution, whether each
//! metric is available at all.

pub mod system;

pub use system::SystemProbe;

use tracing::{debug, warn};

/// Value written in place of a metric the platform can't provide.
pub const SENTINEL: f64 = -1.0;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One best-effort measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample {
    Available(f64),
    Unavailable,
}

impl Sample {
    /// The measured value, or [`SENTINEL`].
    pub fn value(self) -> f64 {
        match self {
            Sample::Available(v) => v,
            Sample::Unavailable => SENTINEL,
        }
    }

    /// `max(before, after)`: the high-water approximation used for memory.
    ///
    /// This is not a true peak; it misses anything allocated and freed
    /// inside the timed call.
    pub fn high_water(before: Sample, after: Sample) -> Sample {
        match (before, after) {
            (Sample::Available(b), Sample::Available(a)) => Sample::Available(b.max(a)),
            _ => Sample::Unavailable,
        }
    }

    /// Average of the two samples, used for CPU utilization.
    pub fn mean(before: Sample, after: Sample) -> Sample {
        match (before, after) {
            (Sample::Available(b), Sample::Available(a)) => Sample::Available((b + a) / 2.0),
            _ => Sample::Unavailable,
        }
    }
}

/// Raw platform readings. `None` means "not available right now".
pub trait ResourceProbe {
    /// Resident memory of the current process, in bytes.
    fn memory_bytes(&mut self) -> Option<u64>;

    /// CPU utilization of the current process since the previous call, as
    /// a percentage of one core.
    fn cpu_percent(&mut self) -> Option<f64>;
}

impl<P: ResourceProbe + ?Sized> ResourceProbe for Box<P> {
    fn memory_bytes(&mut self) -> Option<u64> {
        (**self).memory_bytes()
    }

    fn cpu_percent(&mut self) -> Option<f64> {
        (**self).cpu_percent()
    }
}

/// Probe for platforms with no instrumentation: every reading is missing.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableProbe;

impl ResourceProbe for UnavailableProbe {
    fn memory_bytes(&mut self) -> Option<u64> {
        None
    }

    fn cpu_percent(&mut self) -> Option<f64> {
        None
    }
}

/// Memory and CPU taken at the same point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    pub memory_mb: Sample,
    pub cpu_percent: Sample,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Metric {
    Unknown,
    Available { last: f64 },
    Unavailable,
}

impl Metric {
    /// Availability is settled by the first reading and never changes, so
    /// one execution never mixes real values with the sentinel. A later
    /// missing reading repeats the last good value.
    fn record(&mut self, name: &str, reading: Option<f64>) -> Sample {
        match (*self, reading) {
            (Metric::Unknown, Some(v)) => {
                debug!(metric = name, "resource sampling available");
                *self = Metric::Available { last: v };
                Sample::Available(v)
            }
            (Metric::Unknown, None) => {
                warn!(metric = name, "resource sampling unavailable, reporting {}", SENTINEL);
                *self = Metric::Unavailable;
                Sample::Unavailable
            }
            (Metric::Available { .. }, Some(v)) => {
                *self = Metric::Available { last: v };
                Sample::Available(v)
            }
            (Metric::Available { last }, None) => {
                warn!(metric = name, last, "resource reading failed, repeating last value");
                Sample::Available(last)
            }
            (Metric::Unavailable, _) => Sample::Unavailable,
        }
    }
}

/// Turns probe readings into consistent [`Sample`]s for one execution.
#[derive(Debug)]
pub struct Sampler<P> {
    probe: P,
    memory: Metric,
    cpu: Metric,
}

impl<P: ResourceProbe> Sampler<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            memory: Metric::Unknown,
            cpu: Metric::Unknown,
        }
    }

    /// Settles availability and starts the CPU interval. Called once
    /// before the measured phase.
    pub fn prime(&mut self) {
        self.snapshot();
    }

    pub fn memory_mb(&mut self) -> Sample {
        let reading = self.probe.memory_bytes().map(|b| b as f64 / BYTES_PER_MB);
        self.memory.record("memory_mb", reading)
    }

    pub fn cpu_percent(&mut self) -> Sample {
        let reading = self.probe.cpu_percent().map(|p| p.clamp(0.0, 100.0));
        self.cpu.record("cpu_percent", reading)
    }

    /// Memory first, then CPU.
    pub fn snapshot(&mut self) -> Snapshot {
        let memory_mb = self.memory_mb();
        let cpu_percent = self.cpu_percent();
        Snapshot {
            memory_mb,
            cpu_percent,
        }
    }
}
