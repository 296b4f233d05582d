use super::*;

fn out_dir(name: &str) -> std::path::PathBuf {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("export_unit")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn sample() -> Vec<HighlightedWord> {
    let mut w = HighlightedWord::new("الخبر", "[[y]]الخبر[[/y]]", 1).with_source_line(0);
    w.attach_timing(1.0, 2.0, 0.8);
    vec![w]
}

#[test]
fn csv_file_round_trips_header_and_row() {
    let dir = out_dir("csv");
    let path = dir.join("words.csv");
    assert!(export_csv_file(&path, &sample(), &["word", "start_time"], TimeFormat::Seconds));
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "word,start_time\nالخبر,1.000\n");
}

#[test]
fn json_file_is_valid_json() {
    let dir = out_dir("json");
    let path = dir.join("words.json");
    assert!(export_json_file(&path, &sample(), None));
    let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(v["yellow_words"][0]["word"], "الخبر");
    assert_eq!(v["summary"]["total_words"], 1);
}

#[test]
fn unwritable_destination_reports_false() {
    let dir = out_dir("blocked");
    std::fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("file");
    std::fs::write(&blocker, b"x").unwrap();
    // Parent path is a regular file, so directory creation fails.
    let path = blocker.join("words.csv");
    assert!(!export_csv_file(&path, &sample(), &ALLOWED, TimeFormat::Seconds));
    assert!(!export_json_file(&path, &sample(), None));
}

#[test]
fn io_failures_surface_as_export_errors() {
    let dir = out_dir("variant");
    std::fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("file");
    std::fs::write(&blocker, b"x").unwrap();
    let path = blocker.join("words.csv");
    let err = write_csv_file(&path, &[vec!["word".to_owned()]]).unwrap_err();
    assert!(matches!(err, ArabsubError::Export(_)), "{err:?}");
    let err = write_json_file(&path, &serde_json::json!({})).unwrap_err();
    assert!(matches!(err, ArabsubError::Export(_)), "{err:?}");
}

const ALLOWED: [&str; 6] = table::ALLOWED_COLUMNS;
