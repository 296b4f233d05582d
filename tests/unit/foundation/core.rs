use super::*;
use serde_json::json;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(30, 1).unwrap();
    assert!((fps.frame_duration_secs() - 1.0 / 30.0).abs() < 1e-12);
    assert_eq!(fps.secs_to_frames_ceil(1.01), 31);
}

#[test]
fn fps_from_float_rate() {
    let fps = Fps::from_f64(29.97).unwrap();
    assert_eq!(fps, Fps { num: 29970, den: 1000 });
    assert!(Fps::from_f64(f64::NAN).is_err());
}

#[test]
fn canvas_limits() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert!(Canvas::new(1920, 1080).is_ok());
}

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Rgba8 = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Rgba8::rgb(255, 0, 0));

    let c: Rgba8 = serde_json::from_value(json!("0000FF80")).unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 255, 128));

    assert!(Rgba8::from_hex("#12345").is_err());
    assert!(Rgba8::from_hex("#GG0000").is_err());
}

#[test]
fn parses_object_and_array() {
    let c: Rgba8 = serde_json::from_value(json!({"r": 1, "g": 2, "b": 3})).unwrap();
    assert_eq!(c, Rgba8::rgb(1, 2, 3));

    let c: Rgba8 = serde_json::from_value(json!([1, 2, 3, 4])).unwrap();
    assert_eq!(c, Rgba8::rgba(1, 2, 3, 4));

    assert!(serde_json::from_value::<Rgba8>(json!([1, 2])).is_err());
}

#[test]
fn hex_serialization_round_trips_through_serde() {
    let v = serde_json::to_value(Rgba8::YELLOW).unwrap();
    assert_eq!(v, json!("#FFFF00"));
    let v = serde_json::to_value(Rgba8::BLACK.with_opacity(0.7)).unwrap();
    assert_eq!(v, json!("#000000B2"));
}
