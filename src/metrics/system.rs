//! Resource readings from the operating system.

use std::time::{Duration, Instant};

use super::ResourceProbe;

/// Reads the current process's memory and CPU time from the OS.
///
/// - Memory: resident set size from `/proc/self/statm` on Linux, peak RSS
///   (`ru_maxrss`) on other Unix systems.
/// - CPU: user + system time from `getrusage(RUSAGE_SELF)`, divided by
///   the wall time elapsed since the previous reading.
///
/// On non-Unix targets every reading is unavailable.
#[derive(Debug)]
pub struct SystemProbe {
    last: Option<(Instant, Duration)>,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self {
            last: cpu_time().map(|cpu| (Instant::now(), cpu)),
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceProbe for SystemProbe {
    fn memory_bytes(&mut self) -> Option<u64> {
        resident_bytes()
    }

    fn cpu_percent(&mut self) -> Option<f64> {
        let now = Instant::now();
        let cpu = cpu_time()?;

        let percent = match self.last {
            Some((then, cpu_then)) => {
                let wall = now.duration_since(then).as_secs_f64();
                if wall > 0.0 {
                    cpu.saturating_sub(cpu_then).as_secs_f64() / wall * 100.0
                } else {
                    0.0
                }
            }
            None => 0.0,
        };

        self.last = Some((now, cpu));
        Some(percent)
    }
}

#[cfg(unix)]
fn rusage() -> Option<libc::rusage> {
    // SAFETY: rusage is a plain-old-data struct; all-zero bytes is a valid value.
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    // SAFETY: getrusage only writes into the struct we own on the stack.
    let ret = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
    (ret == 0).then_some(usage)
}

#[cfg(unix)]
fn cpu_time() -> Option<Duration> {
    let usage = rusage()?;
    let to_duration = |tv: libc::timeval| {
        Duration::from_secs(tv.tv_sec as u64) + Duration::from_micros(tv.tv_usec as u64)
    };
    Some(to_duration(usage.ru_utime) + to_duration(usage.ru_stime))
}

#[cfg(not(unix))]
fn cpu_time() -> Option<Duration> {
    None
}

#[cfg(target_os = "linux")]
fn resident_bytes() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let resident_pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;

    // SAFETY: sysconf has no preconditions.
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page_size <= 0 {
        return None;
    }
    Some(resident_pages * page_size as u64)
}

#[cfg(all(unix, not(target_os = "linux")))]
fn resident_bytes() -> Option<u64> {
    let usage = rusage()?;
    let max_rss = usage.ru_maxrss as u64;
    // macOS reports ru_maxrss in bytes, the BSDs in kilobytes.
    if cfg!(target_os = "macos") {
        Some(max_rss)
    } else {
        Some(max_rss * 1024)
    }
}

#[cfg(not(unix))]
fn resident_bytes() -> Option<u64> {
    None
}
