//! File sink tests; kept in their own binary because the sink is process-wide.

use logger::{error, info, verbose, warn};
use logger::{set_level, Level};

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_captures_leveled_messages_only() {
    use logger::{enable_verbose, init_file_logging};

    let dir = tempfile::TempDir::new().expect("temp dir");
    let log_path = dir.path().join("cohort.log");

    assert!(init_file_logging(&log_path));
    set_level(Level::Info);

    info!("intake panel computed");
    warn!("3 rows with unrecognized status");
    error!("missing column 'status'");

    enable_verbose();
    verbose!("verbose progress line");

    let contents = std::fs::read_to_string(&log_path).expect("read log file");
    assert!(contents.contains("[INFO] intake panel computed"));
    assert!(contents.contains("[WARN] 3 rows with unrecognized status"));
    assert!(contents.contains("[ERROR] missing column 'status'"));
    assert!(!contents.contains("verbose progress line"));
}
