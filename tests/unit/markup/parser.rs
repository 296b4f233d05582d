use super::*;

fn words(v: &[HighlightedWord]) -> Vec<&str> {
    v.iter().map(HighlightedWord::word).collect()
}

#[test]
fn parses_each_syntax() {
    let p = MarkupParser::new();
    assert_eq!(words(&p.parse_text("هذا [[y]]الخبر[[/y]] مهم")), vec!["الخبر"]);
    assert_eq!(words(&p.parse_text("تعلم <y>البرمجة</y> أمر")), vec!["البرمجة"]);
    assert_eq!(words(&p.parse_text("السفر إلى {y}دبي{/y}")), vec!["دبي"]);
}

#[test]
fn sequence_follows_declaration_order_not_position() {
    let p = MarkupParser::new();
    let text = "السفر إلى {y}دبي{/y} كان [[y]]رائعًا[[/y]] والطقس <y>جميل</y>";
    let got = p.parse_text(text);
    assert_eq!(words(&got), vec!["رائعًا", "جميل", "دبي"]);
    let seqs: Vec<u32> = got.iter().map(HighlightedWord::sequence).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert_eq!(got[0].original_markup(), "[[y]]رائعًا[[/y]]");
}

#[test]
fn sequence_restarts_per_call() {
    let p = MarkupParser::new();
    let a = p.parse_text("<y>a</y> <y>b</y>");
    let b = p.parse_text("<y>c</y>");
    assert_eq!(a[1].sequence(), 2);
    assert_eq!(b[0].sequence(), 1);
}

#[test]
fn delimiters_are_case_insensitive() {
    let p = MarkupParser::new();
    let got = p.parse_text("[[Y]]one[[/Y]] <Y>two</y> {Y}three{/Y}");
    assert_eq!(words(&got), vec!["one", "two", "three"]);
}

#[test]
fn trims_and_discards_empty_content() {
    let p = MarkupParser::new();
    let got = p.parse_text("<y>  word  </y> <y>   </y> [[y]][[/y]]");
    assert_eq!(words(&got), vec!["word"]);
    assert_eq!(got[0].sequence(), 1);
}

#[test]
fn unterminated_tags_do_not_match() {
    let p = MarkupParser::new();
    assert!(p.parse_text("هذا [[y]]الخبر مهم").is_empty());
    assert!(p.parse_text("<y>broken").is_empty());
}

#[test]
fn records_source_line() {
    let p = MarkupParser::new();
    let got = p.parse_text("first line\nsecond <y>here</y>\nthird {y}there{/y}");
    assert_eq!(got[0].source_line_index(), Some(1));
    assert_eq!(got[1].source_line_index(), Some(2));
}

#[test]
fn parsed_records_are_untimed_and_distinct() {
    let p = MarkupParser::new();
    let got = p.parse_text("<y>same</y> <y>same</y>");
    assert_eq!(got.len(), 2);
    assert!(got.iter().all(|w| !w.is_timed() && w.confidence().is_none()));
    assert_ne!(got[0].id(), got[1].id());
}

#[test]
fn remove_markup_strips_all_delimiters() {
    let p = MarkupParser::new();
    let text = "السفر إلى {y}دبي{/y} كان [[Y]]رائعًا[[/y]] والطقس <y>جميل</Y>";
    let clean = p.remove_markup(text);
    assert_eq!(clean, "السفر إلى دبي كان رائعًا والطقس جميل");
    for d in ["[[", "]]", "<y>", "</y>", "{y}", "{/y}"] {
        assert!(!clean.contains(d), "{d} left in {clean}");
    }
}

#[test]
fn remove_markup_is_idempotent() {
    let p = MarkupParser::new();
    for text in [
        "هذا [[y]]الخبر[[/y]] مهم",
        "<<y>y>nested</y>",
        "[[y]][[y]]a[[/y]][[/y]]",
        "{y}unterminated",
        "plain text",
    ] {
        let once = p.remove_markup(text);
        assert_eq!(p.remove_markup(&once), once, "input {text:?}");
        assert!(p.parse_text(&once).is_empty());
    }
}

#[test]
fn exposes_templates_in_declaration_order() {
    assert_eq!(
        MarkupParser::new().supported_patterns(),
        &["[[y]]word[[/y]]", "<y>word</y>", "{y}word{/y}"]
    );
}

#[test]
fn attach_timing_keeps_order_and_clamps_confidence() {
    let mut w = HighlightedWord::new("a", "<y>a</y>", 1);
    w.attach_timing(2.0, 1.0, 1.5);
    assert_eq!(w.start_time(), Some(2.0));
    assert_eq!(w.end_time(), Some(2.0));
    assert_eq!(w.confidence(), Some(1.0));
    assert_eq!(w.duration(), Some(0.0));
}
