// Render pipeline tests: background strategies, caption layout, output files

use std::path::{Path, PathBuf};

use image::{ColorType, DynamicImage, GenericImageView, Rgba, RgbaImage};
use rstest::rstest;
use textimage::canvas::Color;
use textimage::{render_canvas, render_in, Border, OutputFormat, RenderSpec};

fn fixture_font() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts/DejaVuSansMono.ttf")
}

fn decode(path: &Path) -> DynamicImage {
    image::open(path).expect("rendered file should decode")
}

/// Rows containing at least one pixel darker than white.
fn inked_rows(image: &RgbaImage) -> Vec<u32> {
    (0..image.height())
        .filter(|&y| (0..image.width()).any(|x| image.get_pixel(x, y)[0] < 200))
        .collect()
}

/// Test: 200x100 white PNG with one stripped caption line
///
/// The output is an opaque PNG of the requested size, the text is drawn near
/// the offset, and everything away from the text stays background white.
#[test]
fn test_single_line_white_png() {
    let dir = tempfile::tempdir().unwrap();
    let spec = RenderSpec::new(200, 100)
        .with_background_color(Color::white())
        .with_lines(["Hi"])
        .with_strip_text(true)
        .with_text_offset(20, 50)
        .with_font(fixture_font(), 16.0);

    let rendered = render_in(&spec, dir.path()).unwrap();

    assert_eq!(rendered.format, OutputFormat::Png);
    assert_eq!(
        rendered.file_path.extension().and_then(|e| e.to_str()),
        Some("png")
    );

    let image = decode(&rendered.file_path);
    assert_eq!(image.dimensions(), (200, 100));
    // Opaque canvas: no alpha channel written
    assert_eq!(image.color(), ColorType::Rgb8);

    let rgba = image.to_rgba8();
    let rows = inked_rows(&rgba);
    assert!(!rows.is_empty(), "caption should be visible");
    assert!(rows.iter().all(|&y| (30..=55).contains(&y)));

    // Right half and bottom strip are untouched background
    for (x, y, pixel) in rgba.enumerate_pixels() {
        if x >= 100 || y >= 60 {
            assert_eq!(*pixel, Rgba([255, 255, 255, 255]), "pixel ({x}, {y})");
        }
    }
}

/// Test: strip mode ignores every line after the first
#[test]
fn test_strip_mode_draws_exactly_one_line() {
    let base = RenderSpec::new(120, 80)
        .with_text_offset(5, 20)
        .with_line_height(25)
        .with_strip_text(true)
        .with_font(fixture_font(), 12.0);

    let one = render_canvas(&base.clone().with_lines(["Hi"])).unwrap();
    let many = render_canvas(&base.with_lines(["Hi", "second", "third"])).unwrap();

    assert_eq!(one.pixels().as_raw(), many.pixels().as_raw());
}

/// Test: three lines advance by the line height from the starting top
///
/// Lines "A", "B", "C" with top 10 and line height 20 land on baselines
/// 10, 30 and 50, so ink appears just above each of them and nowhere below
/// the last.
#[test]
fn test_three_lines_advance_by_line_height() {
    let spec = RenderSpec::new(100, 100)
        .with_lines(["A", "B", "C"])
        .with_line_height(20)
        .with_text_offset(10, 10)
        .with_font(fixture_font(), 12.0);

    let canvas = render_canvas(&spec).unwrap();
    let rows = inked_rows(canvas.pixels());

    for baseline in [10u32, 30, 50] {
        assert!(
            rows.iter().any(|&y| y + 12 >= baseline && y <= baseline),
            "no ink above baseline {baseline}: {rows:?}"
        );
    }
    assert!(rows.iter().all(|&y| y <= 52), "ink below last line: {rows:?}");
}

/// Test: no lines and no watermark draws nothing on the background
#[test]
fn test_empty_lines_draw_nothing() {
    let spec = RenderSpec::new(30, 30).with_background_color(Color::new(1, 2, 3));
    let canvas = render_canvas(&spec).unwrap();

    assert!(canvas.pixels().pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
}

/// Test: with a zero border the whole canvas is background
#[rstest]
#[case(Color::white())]
#[case(Color::new(12, 200, 99))]
fn test_zero_border_background_is_exact(#[case] background: Color) {
    let spec = RenderSpec::new(64, 32)
        .with_border(Border::default(), Color::black())
        .with_background_color(background);

    let canvas = render_canvas(&spec).unwrap();
    let expected = Rgba([background.r, background.g, background.b, 255]);

    assert!(canvas.pixels().pixels().all(|p| *p == expected));
}

/// Test: border frames the background fill
///
/// The fill runs from `(left, top)` to `(width - right, height - bottom)`
/// with both corners included.
#[test]
fn test_border_frames_background() {
    let border = Border {
        left: 1,
        top: 2,
        right: 3,
        bottom: 4,
    };
    let spec = RenderSpec::new(20, 20)
        .with_border(border, Color::new(255, 0, 0))
        .with_background_color(Color::white());

    let canvas = render_canvas(&spec).unwrap();
    let red = Rgba([255, 0, 0, 255]);
    let white = Rgba([255, 255, 255, 255]);

    for (x, y, pixel) in canvas.pixels().enumerate_pixels() {
        let inside = (1..=17).contains(&x) && (2..=16).contains(&y);
        assert_eq!(*pixel, if inside { white } else { red }, "pixel ({x}, {y})");
    }
    assert_eq!(canvas.pixel(17, 5), Some(white));
    assert_eq!(canvas.pixel(5, 16), Some(white));
    assert_eq!(canvas.pixel(18, 5), Some(red));
    assert_eq!(canvas.pixel(5, 17), Some(red));
}

/// Test: transparent background survives encoding with full transparency
#[rstest]
#[case(OutputFormat::Png)]
#[case(OutputFormat::Gif)]
fn test_transparent_background_every_pixel_transparent(#[case] format: OutputFormat) {
    let dir = tempfile::tempdir().unwrap();
    let spec = RenderSpec::new(40, 20)
        .with_transparent_background(true)
        .with_format(format);

    let rendered = render_in(&spec, dir.path()).unwrap();
    let image = decode(&rendered.file_path).to_rgba8();

    assert_eq!(image.dimensions(), (40, 20));
    assert!(image.pixels().all(|p| p[3] == 0));
}

/// Test: transparent background ignores border and background colors
#[test]
fn test_transparent_background_overrides_colors() {
    let spec = RenderSpec::new(10, 10)
        .with_transparent_background(true)
        .with_border(Border::uniform(2), Color::new(255, 0, 0))
        .with_background_color(Color::new(0, 255, 0));

    let canvas = render_canvas(&spec).unwrap();

    assert!(canvas.save_alpha());
    assert!(canvas.pixels().pixels().all(|p| p[3] == 0));
}

/// Test: unrecognized format falls back to PNG and reports it
#[test]
fn test_unknown_format_renders_png() {
    let dir = tempfile::tempdir().unwrap();
    let spec = RenderSpec::from_yaml_with_env("full_width: 8\nfull_height: 8\nformat: bmp\n").unwrap();

    let rendered = render_in(&spec, dir.path()).unwrap();

    assert_eq!(rendered.format, OutputFormat::Png);
    assert_eq!(rendered.format.as_str(), "png");
    let bytes = std::fs::read(&rendered.file_path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

/// Test: every format writes a file whose suffix matches its content
#[rstest]
#[case(OutputFormat::Png, "png", image::ImageFormat::Png)]
#[case(OutputFormat::Jpg, "jpg", image::ImageFormat::Jpeg)]
#[case(OutputFormat::Gif, "gif", image::ImageFormat::Gif)]
fn test_output_suffix_matches_content(
    #[case] format: OutputFormat,
    #[case] suffix: &str,
    #[case] expected: image::ImageFormat,
) {
    let dir = tempfile::tempdir().unwrap();
    let spec = RenderSpec::new(16, 8).with_format(format);

    let rendered = render_in(&spec, dir.path()).unwrap();

    assert_eq!(rendered.format, format);
    assert!(rendered.file_path.starts_with(dir.path()));
    assert_eq!(
        rendered.file_path.extension().and_then(|e| e.to_str()),
        Some(suffix)
    );
    let bytes = std::fs::read(&rendered.file_path).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), expected);
    assert_eq!(decode(&rendered.file_path).dimensions(), (16, 8));
}

/// Test: PNG output decodes back to exactly the rendered canvas
#[test]
fn test_png_round_trip_preserves_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let spec = RenderSpec::new(90, 40)
        .with_border(Border::uniform(3), Color::new(30, 60, 90))
        .with_background_color(Color::new(250, 240, 230))
        .with_lines(["Round", "trip"])
        .with_text_offset(6, 16)
        .with_line_height(16)
        .with_font(fixture_font(), 11.0)
        .with_text_color(Color::new(200, 0, 0));

    let canvas = render_canvas(&spec).unwrap();
    let rendered = render_in(&spec, dir.path()).unwrap();
    let decoded = decode(&rendered.file_path).to_rgba8();

    assert_eq!(decoded.as_raw(), canvas.pixels().as_raw());
}

/// Test: two renders of the same description never share an output file
#[test]
fn test_renders_get_distinct_files() {
    let dir = tempfile::tempdir().unwrap();
    let spec = RenderSpec::new(4, 4);

    let first = render_in(&spec, dir.path()).unwrap();
    let second = render_in(&spec, dir.path()).unwrap();

    assert_ne!(first.file_path, second.file_path);
    assert!(first.file_path.exists());
    assert!(second.file_path.exists());
}

/// Test: background images are loaded by extension and keep their size
#[test]
fn test_background_image_sets_canvas_size() {
    let dir = tempfile::tempdir().unwrap();
    let background = dir.path().join("bg.png");
    RgbaImage::from_pixel(33, 21, Rgba([9, 8, 7, 255]))
        .save(&background)
        .unwrap();

    // Dimensions are ignored when a background image is given
    let spec = RenderSpec::new(0, 0).with_background_image(&background);
    let canvas = render_canvas(&spec).unwrap();

    assert_eq!(canvas.dimensions(), (33, 21));
    assert!(!canvas.save_alpha());
    assert_eq!(canvas.pixel(32, 20), Some(Rgba([9, 8, 7, 255])));
}

/// Test: a JPEG named `.png` fails to decode
///
/// The codec is chosen from the file extension only, so content that does
/// not match its name is a decode error, not a silent success.
#[test]
fn test_jpeg_named_png_background_fails() {
    let dir = tempfile::tempdir().unwrap();
    let misnamed = dir.path().join("photo.png");
    let jpeg = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(8, 8, image::Rgb([1, 2, 3])));
    jpeg.save_with_format(&misnamed, image::ImageFormat::Jpeg)
        .unwrap();

    let spec = RenderSpec::new(10, 10).with_background_image(&misnamed);
    let err = render_in(&spec, dir.path()).unwrap_err();

    assert_eq!(err.kind(), "decode");
    // No partial output left behind
    let outputs: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("textimage-"))
        .collect();
    assert!(outputs.is_empty());
}

/// Test: a correctly named JPEG background decodes
#[test]
fn test_jpeg_background_decodes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.JPG");
    let jpeg = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(12, 6, image::Rgb([0, 0, 0])));
    jpeg.save_with_format(&path, image::ImageFormat::Jpeg).unwrap();

    let canvas = render_canvas(&RenderSpec::new(0, 0).with_background_image(&path)).unwrap();

    assert_eq!(canvas.dimensions(), (12, 6));
}

/// Test: the description is never modified by a render
#[test]
fn test_render_leaves_description_untouched() {
    let spec = RenderSpec::new(50, 50)
        .with_lines(["a", "b", "c"])
        .with_text_offset(3, 10)
        .with_line_height(12)
        .with_font(fixture_font(), 10.0);

    render_canvas(&spec).unwrap();

    assert_eq!(spec.text_offset.top, 10);
    assert_eq!(spec.text_offset.left, 3);
}

/// Test: an enormous font on a tiny canvas is refused instead of rasterized
#[test]
fn test_huge_font_size_is_allocation_error() {
    let spec = RenderSpec::new(10, 10)
        .with_lines(["WWWWWWWW"])
        .with_text_offset(0, 5)
        .with_font(fixture_font(), 200_000.0);

    let err = render_canvas(&spec).unwrap_err();

    assert_eq!(err.kind(), "allocation");
}

/// Test: an enormous line that lands entirely off the canvas is skipped
#[test]
fn test_huge_font_size_off_canvas_draws_nothing() {
    let spec = RenderSpec::new(10, 10)
        .with_lines(["WWWWWWWW"])
        .with_text_offset(0, -1_000_000)
        .with_font(fixture_font(), 200_000.0);

    let canvas = render_canvas(&spec).unwrap();

    assert!(canvas
        .pixels()
        .pixels()
        .all(|p| *p == Rgba([255, 255, 255, 255])));
}
