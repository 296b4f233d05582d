use super::*;

#[test]
fn summary_counts_and_averages_timed_records() {
    let mut a = HighlightedWord::new("a", "<y>a</y>", 1);
    a.attach_timing(0.0, 2.0, 0.8);
    let mut b = HighlightedWord::new("b", "<y>b</y>", 2);
    b.attach_timing(2.0, 3.0, 0.8);
    let c = HighlightedWord::new("c", "<y>c</y>", 3);
    let records = vec![a, b, c];

    let doc = to_structured_at(&records, None, "2024-01-01T00:00:00+00:00".to_string());
    assert_eq!(doc.summary.total_words, 3);
    assert_eq!(doc.summary.average_duration, Some(1.5));

    let v = serde_json::to_value(&doc).unwrap();
    assert_eq!(v["yellow_words"].as_array().unwrap().len(), 3);
    assert_eq!(v["yellow_words"][0]["word"], "a");
    assert_eq!(v["yellow_words"][0]["original_markup"], "<y>a</y>");
    assert!(v["yellow_words"][2]["start_time"].is_null());
    assert_eq!(v["summary"]["export_timestamp"], "2024-01-01T00:00:00+00:00");
    assert!(v.get("export_settings").is_none());
}

#[test]
fn empty_export_has_null_average() {
    let doc = to_structured(&[], None);
    let v = serde_json::to_value(&doc).unwrap();
    assert_eq!(v["summary"]["total_words"], 0);
    assert!(v["summary"]["average_duration"].is_null());
    assert!(!v["summary"]["export_timestamp"].as_str().unwrap().is_empty());
}

#[test]
fn settings_are_embedded_when_given() {
    let settings = serde_json::json!({ "font_size": 64 });
    let doc = to_structured(&[], Some(settings.clone()));
    let v = serde_json::to_value(&doc).unwrap();
    assert_eq!(v["export_settings"], settings);
}
