use super::*;

#[test]
fn empty_records_give_zero_average() {
    let s = statistics(&[]);
    assert_eq!(s.total_words, 0);
    assert_eq!(s.words_with_timing, 0);
    assert_eq!(s.total_duration, 0.0);
    assert_eq!(s.average_duration, 0.0);
    assert_eq!(s.average_confidence, None);
    assert_eq!(s.min_confidence, None);
    assert_eq!(s.max_confidence, None);
}

#[test]
fn mixed_timed_and_untimed() {
    let mut a = HighlightedWord::new("a", "<y>a</y>", 1);
    a.attach_timing(0.0, 1.0, 0.5);
    let mut b = HighlightedWord::new("b", "<y>b</y>", 2);
    b.attach_timing(1.0, 4.0, 1.0);
    let c = HighlightedWord::new("c", "<y>c</y>", 3);

    let s = statistics(&[a, b, c]);
    assert_eq!(s.total_words, 3);
    assert_eq!(s.words_with_timing, 2);
    assert_eq!(s.total_duration, 4.0);
    assert_eq!(s.average_duration, 2.0);
    assert_eq!(s.average_confidence, Some(0.75));
    assert_eq!(s.min_confidence, Some(0.5));
    assert_eq!(s.max_confidence, Some(1.0));
}
