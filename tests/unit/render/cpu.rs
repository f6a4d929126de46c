use super::*;
use crate::foundation::core::Point;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn system_painter() -> Option<CpuPainter> {
    let path = std::env::var_os("CAPTYTE_TEST_FONT")
        .map(std::path::PathBuf::from)
        .or_else(|| {
            FONT_CANDIDATES
                .iter()
                .map(std::path::PathBuf::from)
                .find(|p| p.exists())
        })?;
    CpuPainter::from_font_path(&path).ok()
}

#[test]
fn invalid_font_bytes_are_rejected() {
    let err = CpuPainter::from_font_bytes(b"not a font".to_vec()).expect_err("bad font");
    assert!(err.to_string().starts_with("paint error:"), "{err}");
}

#[test]
fn oversized_canvas_is_rejected() {
    let err = canvas_to_u16(Canvas::new(70_000, 10).expect("canvas")).expect_err("too wide");
    assert!(err.to_string().contains("width"), "{err}");
}

#[test]
fn pixmap_checks_byte_length() {
    assert!(pixmap_from_premul_bytes(&[0u8; 7], 1, 2).is_err());
    let pm = pixmap_from_premul_bytes(&[1, 2, 3, 4, 5, 6, 7, 8], 1, 2).expect("pixmap");
    assert_eq!((pm.width(), pm.height()), (1, 2));
}

#[test]
fn measures_wider_text_as_wider() {
    let Some(mut painter) = system_painter() else {
        return;
    };
    let short = painter.text_extent("hi ", 1.0).expect("measure");
    let long = painter.text_extent("hi there ", 1.0).expect("measure");
    assert!(long.width > short.width);
    assert!(short.height > 0.0);
    let bare = painter.text_extent("hi", 1.0).expect("measure");
    assert!(short.width > bare.width);
}

#[test]
fn paints_box_and_text_onto_frame() {
    let Some(mut painter) = system_painter() else {
        return;
    };
    let canvas = Canvas::new(64, 32).expect("canvas");
    let mut frame = FrameRGBA::solid(canvas, [0, 0, 0]);
    painter.begin(canvas).expect("begin");
    painter
        .fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::opaque(255, 0, 0), 1.0)
        .expect("box");
    painter
        .draw_text(&TextDraw {
            text: "Hi",
            origin: Point::new(16.0, 24.0),
            font_size: 0.5,
            color: Rgba8::opaque(255, 255, 255),
            pass: TextPass::Fill { width: 0.0 },
        })
        .expect("text");
    painter.finish(&mut frame).expect("finish");

    assert_eq!(frame.pixel(2, 2), Some([255, 0, 0, 255]));
    let lit = frame
        .data
        .chunks_exact(4)
        .filter(|px| px[1] > 0)
        .count();
    assert!(lit > 0, "text pass left no pixels");
}

fn lit_pixels(painter: &mut CpuPainter, width: f64) -> usize {
    let canvas = Canvas::new(96, 48).expect("canvas");
    let mut frame = FrameRGBA::solid(canvas, [0, 0, 0]);
    painter.begin(canvas).expect("begin");
    painter
        .draw_text(&TextDraw {
            text: "Hi",
            origin: Point::new(16.0, 36.0),
            font_size: 0.75,
            color: Rgba8::opaque(255, 255, 255),
            pass: TextPass::Fill { width },
        })
        .expect("text");
    painter.finish(&mut frame).expect("finish");
    frame.data.chunks_exact(4).filter(|px| px[0] > 127).count()
}

#[test]
fn fill_thickness_widens_glyphs() {
    let Some(mut painter) = system_painter() else {
        return;
    };
    let thin = lit_pixels(&mut painter, 0.0);
    let thick = lit_pixels(&mut painter, 4.0);
    assert!(thin > 0, "fill pass left no pixels");
    assert!(thick > thin, "thick {thick} <= thin {thin}");
}

#[test]
fn finish_without_begin_fails() {
    let Some(mut painter) = system_painter() else {
        return;
    };
    let mut frame = FrameRGBA::solid(Canvas::new(4, 4).expect("canvas"), [0, 0, 0]);
    assert!(painter.finish(&mut frame).is_err());
}
