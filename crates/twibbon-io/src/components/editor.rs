//! Interactive editing canvas: photo layer, frame overlay, and the
//! wheel, pinch, and drag handlers that feed the session.
//!
//! The preview is positioned with CSS from the session's [`Placement`]
//! so the browser does the scaling; the raster path only runs on
//! export.

use std::rc::Rc;

use dioxus::prelude::*;
use twibbon_core::{Dimensions, Placement};

/// Props for the [`EditorView`] component.
#[derive(Props, Clone, PartialEq)]
pub struct EditorViewProps {
    /// Logical canvas size (the frame's natural size).
    canvas: Dimensions,
    /// Blob or asset URL of the frame; `None` until it has loaded.
    frame_url: Option<String>,
    /// The frame fetch failed and will not be retried.
    frame_failed: bool,
    /// Blob URL of the uploaded photo.
    photo_url: Option<String>,
    /// Where the photo is drawn, in canvas pixels.
    placement: Option<Placement>,
    /// Wheel delta (positive zooms out).
    on_wheel: EventHandler<f64>,
    /// Touches at the start of a touch sequence.
    on_touch_start: EventHandler<Vec<twibbon_core::TouchPoint>>,
    /// Current touches during a touch sequence.
    on_touch_move: EventHandler<Vec<twibbon_core::TouchPoint>>,
    /// Number of touches remaining after one ends.
    on_touch_end: EventHandler<usize>,
    /// Drag delta in canvas pixels.
    on_drag: EventHandler<(f64, f64)>,
}

fn touch_points(evt: &TouchEvent) -> Vec<twibbon_core::TouchPoint> {
    evt.touches()
        .iter()
        .map(|t| {
            let p = t.client_coordinates();
            twibbon_core::TouchPoint::new(p.x, p.y)
        })
        .collect()
}

/// Canvas pixels per displayed CSS pixel, or `None` while the editor
/// has no measurable width (not laid out yet, or hidden).
fn canvas_ratio(canvas: Dimensions, displayed_width: f64) -> Option<f64> {
    (displayed_width.is_finite() && displayed_width > 0.0)
        .then(|| f64::from(canvas.width) / displayed_width)
}

/// Text shown where the frame would be.
const fn placeholder(frame_failed: bool) -> &'static str {
    if frame_failed {
        "Frame unavailable"
    } else {
        "Loading frame…"
    }
}

/// CSS for the photo layer: the placement expressed as percentages of
/// the canvas, so it tracks the displayed size of the editor.
fn photo_style(canvas: Dimensions, placement: Placement) -> String {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    format!(
        "left: {:.4}%; top: {:.4}%; width: {:.4}%; height: {:.4}%;",
        placement.x / w * 100.0,
        placement.y / h * 100.0,
        placement.width / w * 100.0,
        placement.height / h * 100.0,
    )
}

/// The editor canvas.
///
/// One-finger or mouse drag pans the photo, the wheel and two-finger
/// pinch zoom it. Drags are suspended while a pinch is in progress.
#[component]
pub fn EditorView(props: EditorViewProps) -> Element {
    let mut last_pointer = use_signal(|| Option::<(f64, f64)>::None);
    let mut pinching = use_signal(|| false);
    // Displayed width of the editor in CSS pixels, tracked on mount and
    // on every resize so drags never wait for a measurement.
    let mut displayed_width = use_signal(|| Option::<f64>::None);

    let canvas = props.canvas;
    let has_photo = props.photo_url.is_some();

    let measure_mounted = move |element: Rc<MountedData>| {
        spawn(async move {
            match element.get_client_rect().await {
                Ok(rect) => displayed_width.set(Some(rect.width())),
                Err(e) => tracing::debug!("could not measure editor: {e:?}"),
            }
        });
    };

    let aspect = format!("aspect-ratio: {} / {};", canvas.width, canvas.height);

    rsx! {
        div {
            class: "editor",
            style: "{aspect}",
            onmounted: move |evt: MountedEvent| measure_mounted(evt.data()),
            onresize: move |evt: ResizeEvent| {
                if let Ok(size) = evt.get_border_box_size() {
                    displayed_width.set(Some(size.width));
                }
            },

            onwheel: move |evt: WheelEvent| {
                if has_photo {
                    evt.prevent_default();
                    props.on_wheel.call(evt.delta().strip_units().y);
                }
            },

            ontouchstart: move |evt: TouchEvent| {
                let touches = touch_points(&evt);
                if touches.len() >= 2 {
                    pinching.set(true);
                    last_pointer.set(None);
                }
                props.on_touch_start.call(touches);
            },
            ontouchmove: move |evt: TouchEvent| {
                evt.prevent_default();
                props.on_touch_move.call(touch_points(&evt));
            },
            ontouchend: move |evt: TouchEvent| {
                let remaining = evt.touches().len();
                if remaining < 2 {
                    pinching.set(false);
                }
                props.on_touch_end.call(remaining);
            },

            onpointerdown: move |evt: PointerEvent| {
                if has_photo && evt.is_primary() && !pinching() {
                    let p = evt.client_coordinates();
                    last_pointer.set(Some((p.x, p.y)));
                }
            },
            onpointermove: move |evt: PointerEvent| {
                let Some((lx, ly)) = last_pointer() else {
                    return;
                };
                if !evt.is_primary() || pinching() {
                    return;
                }
                let p = evt.client_coordinates();
                last_pointer.set(Some((p.x, p.y)));
                let r = displayed_width().and_then(|w| canvas_ratio(canvas, w)).unwrap_or(1.0);
                props.on_drag.call(((p.x - lx) * r, (p.y - ly) * r));
            },
            onpointerup: move |_| last_pointer.set(None),
            onpointercancel: move |_| last_pointer.set(None),
            onpointerleave: move |_| last_pointer.set(None),

            if let (Some(url), Some(placement)) = (props.photo_url.clone(), props.placement) {
                img {
                    class: "editor__photo",
                    src: "{url}",
                    alt: "Your photo",
                    draggable: "false",
                    style: "{photo_style(canvas, placement)}",
                }
            }

            if let Some(url) = props.frame_url.clone() {
                img {
                    class: "editor__frame",
                    src: "{url}",
                    alt: "Frame",
                    draggable: "false",
                }
            } else {
                p { class: "editor__placeholder", "{placeholder(props.frame_failed)}" }
            }
        }
    }
}
