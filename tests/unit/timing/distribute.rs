use super::*;

fn hw(word: &str, seq: u32) -> HighlightedWord {
    HighlightedWord::new(word, format!("<y>{word}</y>"), seq)
}

#[test]
fn third_of_four_words_over_ten_seconds() {
    let words = ["a", "b", "c", "d"];
    let mut highlighted = vec![hw("c", 1)];
    let positions = find_highlight_positions(&words, &highlighted);
    assert_eq!(positions, vec![2]);

    distribute_timing(&words, &positions, 0.0, 10.0, &mut highlighted);
    assert_eq!(highlighted[0].start_time(), Some(5.0));
    assert_eq!(highlighted[0].end_time(), Some(7.5));
    assert_eq!(highlighted[0].confidence(), Some(DEFAULT_CONFIDENCE));
}

#[test]
fn offsets_by_segment_start() {
    let words = ["x", "y"];
    let mut highlighted = vec![hw("y", 1)];
    distribute_timing(&words, &[1], 4.0, 6.0, &mut highlighted);
    assert_eq!(highlighted[0].start_time(), Some(5.0));
    assert_eq!(highlighted[0].end_time(), Some(6.0));
}

#[test]
fn position_matching_is_case_insensitive_first_occurrence() {
    let words = ["Alpha", "beta", "ALPHA"];
    let highlighted = vec![hw("alpha", 1), hw(" Beta ", 2), hw("missing", 3)];
    assert_eq!(find_highlight_positions(&words, &highlighted), vec![0, 1]);
}

#[test]
fn repeated_word_resolves_to_first_position() {
    let words = ["x", "same", "y", "same"];
    let mut highlighted = vec![hw("same", 1), hw("same", 2)];
    let positions = find_highlight_positions(&words, &highlighted);
    assert_eq!(positions, vec![1, 1]);

    distribute_timing(&words, &positions, 0.0, 4.0, &mut highlighted);
    assert_eq!(highlighted[0].start_time(), Some(1.0));
    assert!(!highlighted[1].is_timed());
}

#[test]
fn trailing_records_stay_untimed() {
    let words = ["a", "b", "c"];
    let mut highlighted = vec![hw("a", 1), hw("zzz", 2)];
    distribute_timing(&words, &[0], 0.0, 3.0, &mut highlighted);
    assert!(highlighted[0].is_timed());
    assert!(highlighted[1].start_time().is_none());
    assert!(highlighted[1].confidence().is_none());
}

#[test]
fn empty_inputs_are_a_no_op() {
    let mut highlighted = vec![hw("a", 1)];
    distribute_timing::<&str>(&[], &[0], 0.0, 3.0, &mut highlighted);
    distribute_timing(&["a"], &[], 0.0, 3.0, &mut highlighted);
    assert!(!highlighted[0].is_timed());
}

#[test]
fn clock_active_words_include_both_boundaries() {
    let clock = SegmentClock::new(0.0, 4.0, 4);
    assert_eq!(clock.word_duration(), 1.0);
    assert_eq!(clock.active_at(0.5).into_iter().collect::<Vec<_>>(), vec![0]);
    assert_eq!(clock.active_at(1.0).into_iter().collect::<Vec<_>>(), vec![0, 1]);
    assert!(clock.active_at(4.5).is_empty());
    assert!(SegmentClock::new(0.0, 4.0, 0).active_at(1.0).is_empty());
}
