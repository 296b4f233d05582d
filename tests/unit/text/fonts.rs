use super::*;

#[test]
fn scan_dir_picks_font_files_by_stem() {
    let dir = PathBuf::from("target").join("font_registry_scan");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("Cairo-Bold.ttf"), b"x").unwrap();
    std::fs::write(dir.join("Amiri.OTF"), b"x").unwrap();
    std::fs::write(dir.join("readme.txt"), b"x").unwrap();

    let mut reg = FontRegistry::new();
    reg.register("Cairo-Bold", "/elsewhere/Cairo-Bold.ttf");
    let added = reg.scan_dir(&dir).unwrap();

    assert_eq!(added, 1);
    assert_eq!(reg.names(), vec!["Amiri", "Cairo-Bold"]);
    assert_eq!(
        reg.path("Cairo-Bold"),
        Some(Path::new("/elsewhere/Cairo-Bold.ttf"))
    );
}

#[test]
fn unknown_font_is_a_layout_error() {
    let reg = FontRegistry::new();
    let err = reg.shaper("Nope", 32.0).unwrap_err();
    assert!(err.to_string().contains("layout error"));
}

#[test]
fn missing_dir_is_an_error() {
    let mut reg = FontRegistry::new();
    assert!(reg.scan_dir(Path::new("target/definitely/not/here")).is_err());
}
