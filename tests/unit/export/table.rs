use super::*;

fn timed(word: &str, seq: u32, start: f64, end: f64) -> HighlightedWord {
    let mut w = HighlightedWord::new(word, format!("<y>{word}</y>"), seq).with_source_line(0);
    w.attach_timing(start, end, 0.8);
    w
}

#[test]
fn header_row_then_one_row_per_record() {
    let records = vec![timed("الخبر", 1, 1.0, 2.0), timed("مهم", 2, 2.0, 3.0)];
    let rows = to_table(&records, &ALLOWED_COLUMNS, TimeFormat::Seconds);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], ALLOWED_COLUMNS.map(String::from).to_vec());
    assert_eq!(rows[1], vec!["1", "الخبر", "1.000", "2.000", "0", "0.8"]);
}

#[test]
fn column_selection_and_order_are_respected() {
    let records = vec![timed("x", 1, 0.5, 1.25)];
    let rows = to_table(&records, &["end_time", "word"], TimeFormat::Seconds);
    assert_eq!(rows[0], vec!["end_time", "word"]);
    assert_eq!(rows[1], vec!["1.250", "x"]);
}

#[test]
fn unset_fields_and_unknown_columns_are_empty() {
    let records = vec![HighlightedWord::new("x", "<y>x</y>", 1)];
    let rows = to_table(&records, &["start_time", "nonsense", "confidence"], TimeFormat::Seconds);
    assert_eq!(rows[1], vec!["", "", ""]);
}

#[test]
fn timecode_format() {
    assert_eq!(format_timecode(0.0), "00:00:00.000");
    assert_eq!(format_timecode(3725.5), "01:02:05.500");
    assert_eq!(format_timecode(-1.0), "00:00:00.000");
    assert_eq!(TimeFormat::Timecode.format(61.0), "00:01:01.000");
}

#[test]
fn csv_quotes_fields_that_need_it() {
    let rows = vec![
        vec!["word".to_string(), "note".to_string()],
        vec!["a,b".to_string(), "say \"hi\"".to_string()],
    ];
    assert_eq!(to_csv(&rows), "word,note\n\"a,b\",\"say \"\"hi\"\"\"\n");
}
