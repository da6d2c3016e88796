// Render description loading tests

use std::path::Path;

use image::GenericImageView;
use textimage::canvas::Color;
use textimage::{render_in, OutputFormat, RenderSpec};

/// Test: a YAML description on disk renders end to end
#[test]
fn test_yaml_file_renders() {
    let dir = tempfile::tempdir().unwrap();
    let font = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts/DejaVuSansMono.ttf");
    std::env::set_var("TEXTIMAGE_TEST_FIXTURE_FONT", &font);

    let yaml = r##"
full_width: 160
full_height: 48
border: { left: 2, top: 2, right: 2, bottom: 2 }
background_color: "#FAFAFA"
border_color: [0, 0, 128]
lines: ["Label", "ignored"]
strip_text: true
text_offset: { left: 8, top: 30 }
font_path: ${TEXTIMAGE_TEST_FIXTURE_FONT}
font_size: 14
format: gif
"##;
    let spec_path = dir.path().join("label.yaml");
    std::fs::write(&spec_path, yaml).unwrap();

    let spec = RenderSpec::from_file(&spec_path).unwrap();
    assert_eq!(spec.font_path(), Some(font.as_path()));
    assert_eq!(spec.format, OutputFormat::Gif);

    let rendered = render_in(&spec, dir.path()).unwrap();
    assert_eq!(rendered.format, OutputFormat::Gif);

    let image = image::open(&rendered.file_path).unwrap();
    assert_eq!(image.dimensions(), (160, 48));
}

/// Test: a description survives a YAML round trip
///
/// Colors serialize as `#RRGGBB` and the format as its lowercase tag, so a
/// saved description reads back identically.
#[test]
fn test_yaml_round_trip() {
    let spec = RenderSpec::new(320, 80)
        .with_background_color(Color::new(0xAB, 0xCD, 0xEF))
        .with_lines(["one", "two"])
        .with_line_height(18)
        .with_font("fonts/mono.ttf", 11.5)
        .with_watermark_text("DRAFT", 30.0, 0.25)
        .with_format(OutputFormat::Jpg)
        .with_jpeg_quality(88);

    let yaml = serde_yaml::to_string(&spec).unwrap();
    assert!(yaml.contains("'#ABCDEF'") || yaml.contains("\"#ABCDEF\""));
    assert!(yaml.contains("format: jpg"));

    let parsed = RenderSpec::from_yaml_with_env(&yaml).unwrap();
    assert_eq!(parsed.background_color, spec.background_color);
    assert_eq!(parsed.lines, spec.lines);
    assert_eq!(parsed.line_height, 18);
    assert_eq!(parsed.font_size, 11.5);
    assert_eq!(parsed.watermark_text(), Some("DRAFT"));
    assert_eq!(parsed.watermark_text_opacity, 0.25);
    assert_eq!(parsed.format, OutputFormat::Jpg);
    assert_eq!(parsed.jpeg_quality, 88);
}

/// Test: malformed YAML is a config error
#[test]
fn test_malformed_yaml_is_config_error() {
    let err = RenderSpec::from_yaml_with_env("full_width: [unclosed\n").unwrap_err();
    assert_eq!(err.kind(), "config");
}

/// Test: missing required dimensions are rejected at parse time
#[test]
fn test_missing_dimensions_rejected() {
    assert!(RenderSpec::from_yaml_with_env("lines: [a]\n").is_err());
}
