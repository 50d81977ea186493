use calendar_core::{flush_logging, init_logging};
use std::fs;

#[test]
fn flushed_records_reach_the_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");

    init_logging("info", &log_dir).unwrap();
    log::info!("event=flush_check module=test status=ok");
    flush_logging();

    let contents = fs::read_dir(&log_dir)
        .unwrap()
        .map(|entry| fs::read_to_string(entry.unwrap().path()).unwrap())
        .collect::<String>();
    assert!(contents.contains("event=flush_check"));
    assert!(contents.contains("event=core_init"));
}
