use image::{DynamicImage, Rgba, RgbaImage};
use picdraw::qr::{self, hex_to_rgba, QrOptions};
use picdraw::{Canvas, Error, PicType};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_png(path: &std::path::Path, w: u32, h: u32, color: [u8; 4]) {
    RgbaImage::from_pixel(w, h, Rgba(color)).save(path).unwrap();
}

#[test]
fn compose_pictures_and_export() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let base_path = dir.path().join("1.png");
    let sticker_path = dir.path().join("2.png");
    write_png(&base_path, 600, 500, [255, 255, 255, 255]);
    write_png(&sticker_path, 80, 60, [0, 0, 200, 255]);

    let mut base = Canvas::open(&base_path).unwrap();
    let mut sticker = Canvas::open(&sticker_path).unwrap();

    sticker.resize(300, 300);
    base.draw_image(&sticker, 0, 100);
    sticker.resize(150, 150);
    base.draw_image(&sticker, 400, 200);

    assert_eq!(base.dimensions(), (600, 500));
    let img = base.image().to_rgba8();
    assert_eq!(img.get_pixel(150, 250), &Rgba([0, 0, 200, 255]));
    assert_eq!(img.get_pixel(450, 250), &Rgba([0, 0, 200, 255]));
    assert_eq!(img.get_pixel(350, 50), &Rgba([255, 255, 255, 255]));

    let out = dir.path().join("3.png");
    base.save(&out, 100, PicType::Png).unwrap();
    let reopened = Canvas::open(&out).unwrap();
    assert_eq!(reopened.image().to_rgba8(), img);
}

#[test]
fn base64_in_base64_out() {
    init_logger();
    let canvas = Canvas::from_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        16,
        16,
        Rgba([30, 60, 90, 255]),
    )));
    let jpeg = canvas.to_base64(80, PicType::Jpeg).unwrap();
    let decoded = Canvas::from_base64(&jpeg).unwrap();
    assert_eq!(decoded.dimensions(), (16, 16));
    let px = decoded.image().to_rgba8().get_pixel(8, 8).0;
    for (got, want) in px.iter().zip([30u8, 60, 90]) {
        assert!((*got as i32 - want as i32).abs() <= 4, "{px:?}");
    }
}

#[test]
fn qr_canvas_with_logo_on_poster() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let logo_path = dir.path().join("logo.png");
    write_png(&logo_path, 64, 64, [255, 165, 0, 255]);

    let logo_qr = qr::qr_logo_code("https://example.com", &logo_path).unwrap();
    assert_eq!(logo_qr.dimensions(), (qr::LOGO_CODE_SIZE, qr::LOGO_CODE_SIZE));

    let mut poster = Canvas::from_qr("poster", 400, Some(hex_to_rgba("ffffff").unwrap()), None).unwrap();
    poster.draw_raw_image(&DynamicImage::ImageRgba8(logo_qr), 125, 125);
    let center = poster.image().to_rgba8().get_pixel(200, 200).0;
    assert_eq!(center, [255, 165, 0, 255]);

    let svg = qr::to_svg_string("poster", &QrOptions::default()).unwrap();
    assert!(svg.contains("<path d=\"M"));
}

#[test]
fn qr_files_for_each_status_color() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    for (content, name, hex) in [
        ("healthy", "healthy.png", "0fe285"),
        ("suspected", "suspected.png", "ffd038"),
        ("isolated", "isolated.png", "f8931d"),
        ("confirmed", "confirmed.png", "f53e77"),
    ] {
        let fg = hex_to_rgba(hex).unwrap();
        let path = qr::build_qr_code(content, dir.path(), name, Some(Rgba([255, 255, 255, 255])), Some(fg)).unwrap();
        let img = image::open(&path).unwrap().to_rgba8();
        assert!(img.pixels().any(|p| *p == fg), "{name} has no foreground pixels");
    }
}

#[test]
fn errors_are_propagated() {
    assert!(matches!(Canvas::open("/no/such/base.png"), Err(Error::Io(_))));
    assert!(matches!(hex_to_rgba("nope"), Err(Error::InvalidColor { .. })));

    let mut canvas = Canvas::from_image(DynamicImage::ImageRgba8(RgbaImage::new(2, 2)));
    assert!(matches!(canvas.init_font("/no/such/font.ttf"), Err(Error::Io(_))));
    assert!(matches!(canvas.init_font_bytes(vec![0; 16]), Err(Error::Font(_))));
    assert!(!canvas.has_font());
}

#[test]
fn captions_on_a_poster() {
    init_logger();
    let font_path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts/DejaVuSans.ttf");
    let white = Rgba([255, 255, 255, 255]);
    let mut poster = Canvas::from_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(300, 120, white)));
    poster.init_font(font_path).unwrap();

    poster.draw_text("hahahah", 10, 40).unwrap();
    poster.set_font_color(255, 0, 0, 255);
    poster.set_font_size(40.0);
    poster.draw_text("hahahah", 10, 100).unwrap();

    let img = poster.image().to_rgba8();
    let black_above = (0..45).any(|y| (0..300).any(|x| img.get_pixel(x, y) == &Rgba([0, 0, 0, 255])));
    let red_below = (60..105).any(|y| (0..300).any(|x| img.get_pixel(x, y) == &Rgba([255, 0, 0, 255])));
    assert!(black_above);
    assert!(red_below);
}
