use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use matbench::report::HEADER;
use matbench::{
    BenchConfig, BenchError, Benchmark, ConfigError, CsvSink, ResourceProbe, Sample, SystemProbe,
    UnavailableProbe,
};

/// Probe replaying fixed readings, one per call.
struct ScriptedProbe {
    memory: Vec<u64>,
    cpu: Vec<f64>,
}

impl ResourceProbe for ScriptedProbe {
    fn memory_bytes(&mut self) -> Option<u64> {
        Some(self.memory.remove(0))
    }

    fn cpu_percent(&mut self) -> Option<f64> {
        Some(self.cpu.remove(0))
    }
}

const MB: u64 = 1024 * 1024;

fn config(n: usize, runs: usize, output: &Path) -> BenchConfig {
    BenchConfig {
        n,
        runs,
        seed: 123,
        output: output.to_path_buf(),
        ..BenchConfig::default()
    }
}

fn data_rows(csv: &str) -> Vec<Vec<String>> {
    csv.lines()
        .skip(1)
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect()
}

// ============================================================
// End-to-end scenario
// ============================================================

#[test]
fn test_scenario_n4_runs3_seed123() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("rust.csv");

    let records = Benchmark::new(config(4, 3, &out), SystemProbe::new())
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(records.len(), 3);

    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4, "header + 3 rows");
    assert_eq!(lines[0], "language,n,run,seconds,memory_mb,cpu_percent");

    for (i, row) in data_rows(&csv).iter().enumerate() {
        assert_eq!(row.len(), 6);
        assert_eq!(row[0], "rust");
        assert_eq!(row[1], "4");
        assert_eq!(row[2], (i + 1).to_string());

        let seconds: f64 = row[3].parse().unwrap();
        assert!(seconds > 0.0, "row {}: seconds {}", i + 1, seconds);

        let memory: f64 = row[4].parse().unwrap();
        assert!(memory >= 0.0 || memory == -1.0);

        let cpu: f64 = row[5].parse().unwrap();
        assert!((0.0..=100.0).contains(&cpu) || cpu == -1.0, "cpu {}", cpu);
    }
}

#[test]
fn test_row_count_and_run_indices() {
    let mut sink = CsvSink::new(Vec::new());
    let runs = 7;

    Benchmark::new(config(8, runs, Path::new("unused.csv")), UnavailableProbe)
        .unwrap()
        .run_with_sink(&mut sink)
        .unwrap();

    let csv = String::from_utf8(sink.finish().unwrap()).unwrap();
    assert_eq!(csv.lines().next(), Some(HEADER));

    let indices: Vec<usize> = data_rows(&csv)
        .iter()
        .map(|row| row[2].parse().unwrap())
        .collect();
    assert_eq!(indices, (1..=runs).collect::<Vec<_>>());
    assert!(csv.ends_with('\n'));
}

#[test]
fn test_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("results").join("nested").join("rust.csv");

    Benchmark::new(config(2, 1, &out), UnavailableProbe)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap().lines().count(), 2);
}

#[test]
fn test_overwrites_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("rust.csv");
    fs::write(&out, "stale\nstale\nstale\nstale\nstale\n").unwrap();

    Benchmark::new(config(2, 2, &out), UnavailableProbe)
        .unwrap()
        .run()
        .unwrap();

    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(!csv.contains("stale"));
}

// ============================================================
// Resource sampling
// ============================================================

#[test]
fn test_sentinel_when_sampling_unavailable() {
    let mut sink = CsvSink::new(Vec::new());

    let records = Benchmark::new(config(4, 5, Path::new("unused.csv")), UnavailableProbe)
        .unwrap()
        .run_with_sink(&mut sink)
        .unwrap();

    for record in &records {
        assert_eq!(record.cpu_percent, Sample::Unavailable);
        assert_eq!(record.memory_mb, Sample::Unavailable);
    }

    let csv = String::from_utf8(sink.finish().unwrap()).unwrap();
    for row in data_rows(&csv) {
        assert_eq!(row[4], "-1.00");
        assert_eq!(row[5], "-1.0");
    }
}

#[test]
fn test_memory_high_water_and_cpu_mean() {
    // Priming takes one reading of each, then two per run.
    let probe = ScriptedProbe {
        memory: vec![MB, 10 * MB, 12 * MB, 30 * MB, 20 * MB],
        cpu: vec![0.0, 90.0, 100.0, 80.0, 60.0],
    };
    let mut sink = CsvSink::new(Vec::new());

    let records = Benchmark::new(config(3, 2, Path::new("unused.csv")), probe)
        .unwrap()
        .run_with_sink(&mut sink)
        .unwrap();

    assert_eq!(records[0].memory_mb, Sample::Available(12.0));
    assert_eq!(records[0].cpu_percent, Sample::Available(95.0));
    assert_eq!(records[1].memory_mb, Sample::Available(30.0));
    assert_eq!(records[1].cpu_percent, Sample::Available(70.0));

    let csv = String::from_utf8(sink.finish().unwrap()).unwrap();
    let rows = data_rows(&csv);
    assert_eq!(&rows[0][4..], &["12.00", "95.0"]);
    assert_eq!(&rows[1][4..], &["30.00", "70.0"]);
}

#[test]
fn test_language_label() {
    let mut sink = CsvSink::new(Vec::new());
    let config = BenchConfig {
        language: "rust-O3".to_string(),
        ..config(2, 2, Path::new("unused.csv"))
    };

    Benchmark::new(config, UnavailableProbe)
        .unwrap()
        .run_with_sink(&mut sink)
        .unwrap();

    let csv = String::from_utf8(sink.finish().unwrap()).unwrap();
    assert!(data_rows(&csv).iter().all(|row| row[0] == "rust-O3"));
}

// ============================================================
// Configuration and I/O errors
// ============================================================

#[test]
fn test_invalid_configs_rejected() {
    let base = BenchConfig::default();
    let cases = [
        (BenchConfig { n: 0, ..base.clone() }, ConfigError::ZeroDimension),
        (BenchConfig { runs: 0, ..base.clone() }, ConfigError::ZeroRuns),
        (
            BenchConfig { warmup: 1, ..base.clone() },
            ConfigError::TooFewWarmups { min: 2, got: 1 },
        ),
        (
            BenchConfig { language: String::new(), ..base.clone() },
            ConfigError::EmptyLanguage,
        ),
        (
            BenchConfig { language: "c,pp".to_string(), ..base.clone() },
            ConfigError::InvalidLanguage("c,pp".to_string()),
        ),
    ];

    for (config, expected) in cases {
        match Benchmark::new(config, UnavailableProbe) {
            Err(BenchError::Config(err)) => assert_eq!(err, expected),
            other => panic!("expected {:?}, got {:?}", expected, other.map(|_| ())),
        }
    }
}

#[test]
fn test_default_config() {
    let config = BenchConfig::default();

    assert_eq!(config.n, 512);
    assert_eq!(config.runs, 5);
    assert_eq!(config.seed, 123);
    assert_eq!(config.warmup, 2);
    assert_eq!(config.language, "rust");
    assert!(config.validate().is_ok());
}

#[test]
fn test_unwritable_output_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, "").unwrap();
    let out = blocker.join("rust.csv");

    let err = Benchmark::new(config(2, 1, &out), UnavailableProbe)
        .unwrap()
        .run()
        .unwrap_err();

    assert!(matches!(err, BenchError::CreateOutput { .. }), "{:?}", err);
}

#[test]
fn test_write_failure_keeps_flushed_rows() {
    /// Buffers writes until `flush`, then moves them to `flushed`. Fails
    /// every write after the first `writes_left`.
    struct FailAfter {
        writes_left: usize,
        pending: Vec<u8>,
        flushed: Rc<RefCell<Vec<u8>>>,
    }

    impl std::io::Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.writes_left == 0 {
                return Err(std::io::Error::other("disk full"));
            }
            self.writes_left -= 1;
            self.pending.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.borrow_mut().append(&mut self.pending);
            Ok(())
        }
    }

    let flushed = Rc::new(RefCell::new(Vec::new()));
    // Header and one row succeed, the second row fails.
    let mut sink = CsvSink::new(FailAfter {
        writes_left: 2,
        pending: Vec::new(),
        flushed: Rc::clone(&flushed),
    });
    let err = Benchmark::new(config(2, 5, Path::new("unused.csv")), UnavailableProbe)
        .unwrap()
        .run_with_sink(&mut sink)
        .unwrap_err();

    assert!(matches!(err, BenchError::Write { .. }), "{:?}", err);

    // Everything completed before the failure is on disk, nothing more.
    let csv = String::from_utf8(flushed.borrow().clone()).unwrap();
    assert!(csv.ends_with('\n'), "partial row flushed: {:?}", csv);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2, "header + 1 row: {:?}", csv);
    assert_eq!(lines[0], HEADER);
    let row = &data_rows(&csv)[0];
    assert_eq!(row.len(), 6);
    assert_eq!(&row[..3], &["rust", "2", "1"]);
}
