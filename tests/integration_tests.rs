//! Integration tests for the driver model, signal hook and full runs.

use std::path::Path;

use syncreg::config::Config;
use syncreg::sched::Kernel;
use syncreg::sim::model::{log_path, Model};
use syncreg::sim::signals::{self, SignalAction};
use syncreg::storage::ChangeLog;

/// Creates a configuration for `cycles` cycles with the given stall rate.
fn create_config(cycles: u64, stall_every: u64) -> Config {
    let mut config = Config::default();
    config.general.cycles = cycles;
    config.kernel.period = 10;
    config.model.stride = 4;
    config.model.stall_every = stall_every;
    config
}

/// Runs `model` on `kernel` for the configured number of cycles.
fn run(kernel: &mut Kernel, model: &Model, cycles: u64) {
    for _ in 0..cycles {
        model.eval(kernel.cycle());
        kernel.tick().unwrap();
    }
}

/// Tests the model without stalls.
#[test]
fn test_model_free_running() {
    let config = create_config(10, 0);
    let mut kernel = Kernel::from_config(&config.kernel);
    let model = Model::new(&mut kernel, &config).unwrap();

    run(&mut kernel, &model, 10);

    assert_eq!(model.pc.borrow().read(), 40);
    // ACC sums the committed PC seen in each cycle: 4 * (0 + 1 + ... + 9).
    assert_eq!(model.acc.borrow().read(), 180);
    assert_eq!(kernel.time(), 100);
    assert_eq!(kernel.stats.channel_commits["PC"], 10);
}

/// Tests that stalls drop the program counter's increment for that cycle.
#[test]
fn test_model_with_stalls() {
    let config = create_config(10, 5);
    let mut kernel = Kernel::from_config(&config.kernel);
    let model = Model::new(&mut kernel, &config).unwrap();

    run(&mut kernel, &model, 10);

    assert_eq!(model.pc.borrow().read(), 32);
    assert!(model.pc.borrow().is_enabled());
}

/// Tests the status flag tracking low-byte wraps of the accumulator.
#[test]
fn test_model_status_flag() {
    let config = create_config(12, 0);
    let mut kernel = Kernel::from_config(&config.kernel);
    let model = Model::new(&mut kernel, &config).unwrap();

    // Cycle n adds 4n to ACC: the low byte wraps first when ACC goes from
    // 220 (sum up to n = 10) to 264 in cycle 11.
    run(&mut kernel, &model, 11);
    assert_eq!(model.status.borrow().read() & syncreg::sim::model::STATUS_WRAP, 0);
    run(&mut kernel, &model, 1);
    assert_eq!(
        model.status.borrow().read() & syncreg::sim::model::STATUS_WRAP,
        syncreg::sim::model::STATUS_WRAP
    );
}

/// Tests a logged run persisted to per-register files.
#[test]
fn test_model_logged_run() {
    let dir = std::env::temp_dir().join(format!("syncreg-model-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let base = dir.join("changes.jsonl");
    for name in ["PC", "ACC", "STATUS"] {
        let _ = std::fs::remove_file(log_path(&base, name));
    }

    let mut config = create_config(6, 3);
    config.log.enabled = true;
    config.log.save_path = Some(base.to_string_lossy().into_owned());

    let mut kernel = Kernel::from_config(&config.kernel);
    let model = Model::new(&mut kernel, &config).unwrap();
    run(&mut kernel, &model, 6);
    model.change_save().unwrap();

    // Stalls at cycles 2 and 5 suppress two of six PC commits.
    let pc_log = ChangeLog::<u32>::load(log_path(&base, "PC")).unwrap();
    let values: Vec<u32> = pc_log.iter().map(|e| e.value).collect();
    assert_eq!(values, vec![4, 8, 12, 16]);
    let times: Vec<u64> = pc_log.iter().map(|e| e.time).collect();
    assert_eq!(times, vec![0, 10, 30, 40]);

    // The reset pulse is logged before the six commits.
    let status_log = ChangeLog::<u8>::load(log_path(&base, "STATUS")).unwrap();
    assert_eq!(status_log.len(), 7);

    let mut out = Vec::new();
    model.change_dump(&mut out).unwrap();
    let report = String::from_utf8(out).unwrap();
    assert!(report.contains("* Device: PC"));
    assert!(report.contains("* Device: ACC"));
    assert!(report.contains("* Device: STATUS"));

    let _ = std::fs::remove_dir_all(&dir);
}

/// Tests derivation of per-register log file names.
#[test]
fn test_log_path() {
    assert_eq!(
        log_path(Path::new("changes.jsonl"), "PC"),
        Path::new("changes.PC.jsonl")
    );
    assert_eq!(
        log_path(Path::new("out/trace"), "ACC"),
        Path::new("out/trace.ACC")
    );
}

/// Tests the signal hook: a report signal continues, an interrupt stops.
#[test]
fn test_signal_actions() {
    let mut kernel = Kernel::new(1);
    kernel.tick().unwrap();

    assert_eq!(signals::take(), None);

    signals::record(libc::SIGUSR1);
    let action = signals::take();
    assert_eq!(action, Some(SignalAction::Report(libc::SIGUSR1)));
    assert!(signals::handle(action.unwrap(), &mut kernel.stats));
    assert!(!kernel.stats.is_finished());
    assert_eq!(signals::take(), None);

    signals::record(libc::SIGINT);
    let action = signals::take();
    assert_eq!(action, Some(SignalAction::Abort(libc::SIGINT)));
    assert!(!signals::handle(action.unwrap(), &mut kernel.stats));
    assert!(kernel.stats.is_finished());
}

/// Tests that the handlers install on this platform and can be removed again.
#[test]
fn test_signal_install() {
    let installed = signals::install();
    let restored = signals::restore();
    assert!(installed.is_ok());
    assert!(restored.is_ok());

    // SAFETY: querying a disposition by swapping in the default and back.
    let current = unsafe { libc::signal(libc::SIGINT, libc::SIG_DFL) };
    assert_eq!(current, libc::SIG_DFL);
}
