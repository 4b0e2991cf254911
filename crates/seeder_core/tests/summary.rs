use pretty_assertions::assert_eq;
use seeder_core::{format_runtime, status_line, CleanupCounts, StatsSnapshot, Summary};

#[test]
fn runtime_is_h_mm_ss() {
    assert_eq!(format_runtime(0), "0:00:00");
    assert_eq!(format_runtime(59), "0:00:59");
    assert_eq!(format_runtime(61), "0:01:01");
    assert_eq!(format_runtime(3_600), "1:00:00");
    assert_eq!(format_runtime(90_061), "25:01:01");
}

#[test]
fn status_line_overwrites_previous() {
    assert_eq!(status_line(5), "\rRuntime: 0:00:05");
}

#[test]
fn summary_block_lists_every_counter() {
    let summary = Summary {
        stats: StatsSnapshot {
            num_downloads: 40,
            failed_downloads: 9,
            elapsed_secs: 3_725,
        },
        cleanup: CleanupCounts {
            removed_by_type: 7,
            removed_as_duplicate: 2,
            remaining: 22,
        },
        store_dir: "seeds".to_string(),
    };

    let expected = "\
+===================================================+
Runtime: 1:02:05
Total initial download attempts: 40
Failed downloads: 9
Incorrect file-types removed: 7
Duplicate files removed: 2
A total of 22 unique files now exist in the `seeds` directory
+===================================================+";
    assert_eq!(summary.to_string(), expected);
}
