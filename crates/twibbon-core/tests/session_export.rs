//! Integration test: decode a photo and a frame from PNG bytes, edit the
//! transform through the session, and check the exported PNG.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use image::{Rgba, RgbaImage};
use twibbon_core::{
    CompositorConfig, CompositorError, CompositorSession, Dimensions, FrameSpec, Precondition,
    RelativePosition, TouchPoint, UploadedImage,
};

const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);
const WHITE: [u8; 4] = [255, 255, 255, 255];

fn encode(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgba8,
    )
    .unwrap();
    buf
}

/// A frame with an opaque blue border `border` pixels wide and a fully
/// transparent window.
fn bordered_frame(w: u32, h: u32, border: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(w, h, |x, y| {
        if x < border || y < border || x >= w - border || y >= h - border {
            Rgba([0, 0, 200, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    encode(&img)
}

fn close(actual: [u8; 4], expected: [u8; 4]) -> bool {
    actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= 3)
}

fn session_with_frame(w: u32, h: u32) -> CompositorSession {
    let mut session = CompositorSession::new(CompositorConfig::default());
    let frame = FrameSpec::decode("/frame.png", &bordered_frame(w, h, w / 20)).unwrap();
    session.load_frame(frame);
    session
}

#[test]
fn export_right_after_fit_centers_photo() {
    let mut session = session_with_frame(800, 800);
    // Square photo smaller than the frame: fit scale clamps to 1.0 and the
    // photo covers the whole canvas.
    let photo = UploadedImage::decode("red.png", &encode(&RgbaImage::from_pixel(400, 400, RED))).unwrap();
    session.upload(photo).unwrap();

    let artifact = session.export().unwrap();
    assert_eq!(artifact.dimensions, Dimensions::new(1080, 1080));
    assert_eq!(artifact.filename, "twibbon-result.png");

    let out = image::load_from_memory(&artifact.png).unwrap().to_rgba8();
    assert_eq!(out.dimensions(), (1080, 1080));
    // Window shows the photo, border shows the frame.
    assert!(close(out.get_pixel(540, 540).0, RED.0));
    assert!(close(out.get_pixel(5, 540).0, [0, 0, 200, 255]));
}

#[test]
fn photo_at_half_scale_leaves_white_margins() {
    let mut session = session_with_frame(800, 800);
    // 1600x1600 fits at 0.5: drawn 400x400 centered on an 800x800 canvas.
    let photo = UploadedImage::decode("big.png", &encode(&RgbaImage::from_pixel(1600, 1600, RED))).unwrap();
    session.upload(photo).unwrap();
    approx::assert_relative_eq!(session.transform().scale, 0.5, epsilon = 1e-12);

    let placement = session.placement().unwrap();
    approx::assert_relative_eq!(placement.x, 200.0, epsilon = 1e-9);
    approx::assert_relative_eq!(placement.width, 400.0, epsilon = 1e-9);

    let out = image::load_from_memory(&session.export().unwrap().png)
        .unwrap()
        .to_rgba8();
    // Center is the photo; inside the window but outside the photo is
    // the white background.
    assert!(close(out.get_pixel(540, 540).0, RED.0));
    assert!(close(out.get_pixel(150, 540).0, WHITE));
}

#[test]
fn wide_frame_exports_1080_by_540() {
    let mut session = session_with_frame(1600, 800);
    let photo = UploadedImage::decode("red.png", &encode(&RgbaImage::from_pixel(320, 240, RED))).unwrap();
    session.upload(photo).unwrap();
    let artifact = session.export().unwrap();
    assert_eq!(artifact.dimensions, Dimensions::new(1080, 540));
}

#[test]
fn edits_are_reflected_in_export() {
    let mut session = session_with_frame(800, 800);
    // Left half red, right half green.
    let photo = RgbaImage::from_fn(800, 800, |x, _| {
        if x < 400 { RED } else { Rgba([20, 200, 20, 255]) }
    });
    session
        .upload(UploadedImage::decode("split.png", &encode(&photo)).unwrap())
        .unwrap();
    session.set_slider(2.0);
    // Crop centered at x = 0.25 -> the visible window is all red.
    session.set_position(RelativePosition::new(0.25, 0.5));

    let out = image::load_from_memory(&session.export().unwrap().png)
        .unwrap()
        .to_rgba8();
    assert!(close(out.get_pixel(300, 540).0, RED.0));
    assert!(close(out.get_pixel(780, 540).0, RED.0));
}

#[test]
fn gesture_sequence_never_escapes_bounds() {
    let mut session = session_with_frame(800, 800);
    let photo = UploadedImage::decode("red.png", &encode(&RgbaImage::from_pixel(1000, 700, RED))).unwrap();
    session.upload(photo).unwrap();
    let bounds = session.bounds();

    let touches = |d: f64| [TouchPoint::new(100.0, 100.0), TouchPoint::new(100.0, 100.0 + d)];
    for step in 0..50 {
        let d = f64::from(step);
        session.wheel(if step % 2 == 0 { -37.0 * d } else { 53.0 * d });
        assert!(bounds.contains(session.transform().scale));

        session.touch_start(&touches(10.0 + d));
        session.touch_move(&touches(3.0 * d));
        assert!(bounds.contains(session.transform().scale));
        session.touch_end(1);

        session.set_slider(d / 10.0);
        assert!(bounds.contains(session.transform().scale));
    }
}

#[test]
fn corrupt_upload_is_rejected_and_export_stays_blocked() {
    let mut session = session_with_frame(800, 800);
    let err = UploadedImage::decode("broken.png", &[1, 2, 3, 4]).unwrap_err();
    assert!(matches!(err, CompositorError::ImageDecode(_)));
    assert!(matches!(
        session.export(),
        Err(CompositorError::ExportPrecondition(Precondition::NoImageSelected))
    ));
    // A later good upload still works.
    let photo = UploadedImage::decode("red.png", &encode(&RgbaImage::from_pixel(10, 10, RED))).unwrap();
    session.upload(photo).unwrap();
    assert!(session.export().is_ok());
}
