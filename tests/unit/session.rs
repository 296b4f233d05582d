use super::*;
use crate::config::HighlightMode;
use crate::encode::sink::InMemorySink;
use crate::text::shaper::MonospaceShaper;

fn canvas() -> Canvas {
    Canvas::new(400, 200).unwrap()
}

fn prepared(cfg: RunConfig, segments: &[Segment]) -> SubtitleRun {
    let mut run = SubtitleRun::new(cfg).unwrap();
    run.prepare(segments, canvas(), &mut MonospaceShaper::new(20.0));
    run
}

#[test]
fn highlights_get_segment_relative_timing() {
    let run = prepared(
        RunConfig::default(),
        &[Segment::new(0.0, 3.0, "هذا [[y]]الخبر[[/y]] مهم")],
    );

    let seg = &run.segments()[0];
    assert_eq!(seg.clean_text, "هذا الخبر مهم");
    assert_eq!(seg.words, vec!["هذا", "الخبر", "مهم"]);
    assert_eq!(seg.highlighted, BTreeSet::from([1]));
    assert_eq!(seg.layout.lines, vec!["هذا الخبر مهم"]);
    assert_eq!(seg.highlight_ids.len(), 1);

    let rec = &run.records()[0];
    assert_eq!(rec.word(), "الخبر");
    assert_eq!(rec.start_time(), Some(1.0));
    assert_eq!(rec.end_time(), Some(2.0));
    assert_eq!(rec.confidence(), Some(0.8));
}

#[test]
fn track_only_times_but_does_not_recolor() {
    let cfg = RunConfig {
        highlight_mode: HighlightMode::TrackOnly,
        ..RunConfig::default()
    };
    let run = prepared(cfg, &[Segment::new(0.0, 3.0, "a <y>b</y> c")]);
    assert!(run.segments()[0].highlighted.is_empty());
    assert!(run.records()[0].is_timed());
}

#[test]
fn repeated_word_resolves_to_first_occurrence() {
    let run = prepared(
        RunConfig::default(),
        &[Segment::new(0.0, 2.0, "word {y}WORD{/y}")],
    );
    assert_eq!(run.segments()[0].highlighted, BTreeSet::from([0]));
    assert_eq!(run.records()[0].start_time(), Some(0.0));
    assert_eq!(run.records()[0].end_time(), Some(1.0));
}

#[test]
fn latest_starting_segment_wins_on_overlap() {
    let run = prepared(
        RunConfig::default(),
        &[Segment::new(0.0, 5.0, "first"), Segment::new(2.0, 4.0, "second")],
    );
    assert_eq!(run.segment_at(1.0).unwrap().clean_text, "first");
    assert_eq!(run.segment_at(3.0).unwrap().clean_text, "second");
    assert_eq!(run.segment_at(4.5).unwrap().clean_text, "first");
    assert!(run.segment_at(5.0).is_none());
}

#[test]
fn render_at_draws_only_inside_segments() {
    let run = prepared(RunConfig::default(), &[Segment::new(0.0, 3.0, "a b c")]);
    let mut shaper = MonospaceShaper::new(20.0);
    assert!(!run.render_at(1.5, canvas(), &mut shaper).unwrap().is_fully_transparent());
    assert!(run.render_at(3.0, canvas(), &mut shaper).unwrap().is_fully_transparent());
}

#[test]
fn render_range_streams_every_frame_in_order() {
    let run = prepared(RunConfig::default(), &[Segment::new(0.0, 1.0, "a b")]);
    let mut sink = InMemorySink::new();
    let stats = run
        .render_range(
            Fps::new(2, 1).unwrap(),
            2.0,
            canvas(),
            &mut MonospaceShaper::new(20.0),
            &mut sink,
        )
        .unwrap();

    assert_eq!(
        stats,
        RenderStats {
            frames_total: 4,
            frames_rendered: 3,
            frames_elided: 1,
            frames_empty: 2,
        }
    );
    let frames = sink.frames();
    let idx: Vec<u64> = frames.iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2, 3]);
    assert!(!frames[0].1.is_fully_transparent());
    assert!(!frames[1].1.is_fully_transparent());
    assert!(frames[2].1.is_fully_transparent());
    assert!(frames[3].1.is_fully_transparent());
    assert!(sink.is_ended());
    assert_eq!(sink.config().unwrap().width, 400);
}

#[test]
fn render_range_rejects_empty_duration() {
    let run = prepared(RunConfig::default(), &[]);
    let mut sink = InMemorySink::new();
    let err = run
        .render_range(
            Fps::new(30, 1).unwrap(),
            0.0,
            canvas(),
            &mut MonospaceShaper::new(20.0),
            &mut sink,
        )
        .unwrap_err();
    assert!(matches!(err, ArabsubError::Validation(_)));
}

#[test]
fn summary_and_clear() {
    let mut run = prepared(
        RunConfig::default(),
        &[
            Segment::new(0.0, 2.0, "x [[y]]y[[/y]]"),
            Segment::new(2.0, 4.0, "<y>z</y> missing-word"),
        ],
    );
    let summary = run.summary();
    assert_eq!(summary.segments_processed, 2);
    assert_eq!(summary.highlighted_words_found, 2);
    assert_eq!(summary.statistics.words_with_timing, 2);
    assert_eq!(summary.settings["font_size"], 64.0);
    assert!(summary.video_info.is_none());

    run.clear();
    assert!(run.segments().is_empty());
    assert!(run.tracker().is_empty());
}

#[test]
fn exports_use_configured_columns() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("session_unit");
    let _ = std::fs::remove_dir_all(&dir);

    let mut cfg = RunConfig::default();
    cfg.export.columns = vec!["word".into(), "end_time".into()];
    let run = prepared(cfg, &[Segment::new(0.0, 2.0, "a [[y]]b[[/y]]")]);

    assert!(run.export_csv(&dir.join("words.csv")));
    let csv = std::fs::read_to_string(dir.join("words.csv")).unwrap();
    assert_eq!(csv, "word,end_time\nb,2.000\n");

    assert!(run.export_json(&dir.join("words.json")));
    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("words.json")).unwrap()).unwrap();
    assert_eq!(v["export_settings"]["max_words_per_line"], 3);
}
