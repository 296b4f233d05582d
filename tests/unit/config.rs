use super::*;
use crate::foundation::core::Rgba8;
use crate::render::compositor::Placement;

#[test]
fn defaults_match_tool_defaults() {
    let cfg = RunConfig::default();
    assert_eq!(cfg.font_family, "Cairo-Bold");
    assert_eq!(cfg.font_size, 64.0);
    assert_eq!(cfg.max_words_per_line, 3);
    assert_eq!(cfg.max_width_px(1920), 1536);
    assert!(cfg.recolors_highlights());
    assert_eq!(cfg.export.columns.len(), 6);
    assert_eq!(cfg.style.placement, Placement::BottomCenter);
}

#[test]
fn partial_json_fills_defaults() {
    let json = r##"{
        "font_size": 48,
        "highlight_mode": "track_only",
        "style": { "highlight_color": "#ff0000", "placement": { "custom": { "x": 10, "y": 90 } } },
        "export": { "time_format": "timecode", "columns": ["word"] }
    }"##;
    let cfg = RunConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.font_size, 48.0);
    assert_eq!(cfg.font_family, "Cairo-Bold");
    assert!(!cfg.recolors_highlights());
    assert_eq!(cfg.style.highlight_color, Rgba8::rgb(255, 0, 0));
    assert_eq!(cfg.style.box_opacity, 0.7);
    assert_eq!(cfg.style.placement, Placement::Custom { x: 10.0, y: 90.0 });
    assert_eq!(cfg.export.time_format, TimeFormat::Timecode);
    assert_eq!(cfg.export.columns, vec!["word".to_string()]);
    assert!(cfg.export.include_settings);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(RunConfig::from_reader(r#"{"font_size": 0}"#.as_bytes()).is_err());
    assert!(RunConfig::from_reader(r#"{"max_width_fraction": 1.5}"#.as_bytes()).is_err());
    assert!(RunConfig::from_reader(r#"{"style": {"box_opacity": 2}}"#.as_bytes()).is_err());
    let err = RunConfig::from_reader("not json".as_bytes()).unwrap_err();
    assert!(matches!(err, ArabsubError::Validation(_)));
}

#[test]
fn missing_file_is_validation_error() {
    let err = RunConfig::from_path("target/definitely/missing.json").unwrap_err();
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn settings_value_round_trips() {
    let cfg = RunConfig::default();
    let v = cfg.to_settings_value();
    assert_eq!(v["font_family"], "Cairo-Bold");
    let back: RunConfig = serde_json::from_value(v).unwrap();
    assert_eq!(back, cfg);
}
