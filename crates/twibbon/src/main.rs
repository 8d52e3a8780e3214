use dioxus::prelude::*;
use twibbon_core::{CompositorConfig, CompositorSession, UploadedImage};
use twibbon_io::{EditorView, ExportPanel, FileUpload, ZoomSlider, download, loader, raster};

fn main() {
    dioxus::launch(app);
}

/// Frame asset status.
#[derive(Debug, Clone, PartialEq)]
enum FrameStatus {
    Loading,
    Loaded,
    Failed(String),
}

/// Root application component.
///
/// Owns the compositor session in a signal and wires the upload,
/// editor, zoom slider, and export components to it.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let mut session = use_signal(|| CompositorSession::new(CompositorConfig::default()));
    let mut frame_status = use_signal(|| FrameStatus::Loading);
    let mut photo_url = use_signal(|| Option::<String>::None);
    let mut upload_error = use_signal(|| Option::<String>::None);
    let mut exporting = use_signal(|| false);

    // --- Frame fetch, once at startup ---
    use_future(move || async move {
        let path = session.peek().config().frame_path.clone();
        match loader::load_frame(&path).await {
            Ok(frame) => {
                session.write().load_frame(frame);
                frame_status.set(FrameStatus::Loaded);
            }
            Err(e) => {
                tracing::error!(%path, "failed to load frame: {e}");
                frame_status.set(FrameStatus::Failed(e.to_string()));
            }
        }
    });

    // --- File upload handler ---
    let on_upload = move |(bytes, name): (Vec<u8>, String)| {
        let image = match UploadedImage::decode(name.as_str(), &bytes) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(%name, "rejected upload: {e}");
                upload_error.set(Some(format!("Could not read {name}: {e}")));
                return;
            }
        };
        if let Err(e) = session.write().upload(image) {
            upload_error.set(Some(format!("Could not use {name}: {e}")));
            return;
        }
        upload_error.set(None);

        match raster::bytes_to_blob_url(&bytes, raster::mime_for_filename(&name)) {
            Ok(url) => {
                let previous = photo_url.peek().clone();
                photo_url.set(Some(url));
                if let Some(old) = previous {
                    raster::revoke_blob_url(&old);
                }
            }
            Err(e) => tracing::error!("could not create preview URL: {e}"),
        }
    };

    // --- Export handler ---
    let on_export = move |()| {
        if *exporting.peek() {
            return;
        }
        exporting.set(true);
        spawn(async move {
            // Yield so the busy label paints before the synchronous
            // raster work blocks the thread.
            gloo_timers::future::TimeoutFuture::new(0).await;

            let outcome = session.peek().export();
            match outcome {
                Ok(artifact) => {
                    if let Err(e) = download::save_export(&artifact) {
                        download::alert(&format!("Download failed: {e}"));
                    }
                }
                Err(e) => download::alert(&e.to_string()),
            }
            exporting.set(false);
        });
    };

    // --- Derived view state ---
    let state = session.read();
    let canvas = state.canvas_size();
    let placement = state.placement();
    let transform = state.transform();
    let bounds = state.bounds();
    let ready = state.is_ready();
    let has_image = state.has_image();
    let slider_step = state.config().slider_step;
    let frame_url = (frame_status() == FrameStatus::Loaded).then(|| state.config().frame_path.clone());
    drop(state);

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/main.css") }

        div { class: "app",
            header { class: "app__header",
                h1 { "Twibbon" }
                p { class: "muted", "Upload a photo, position it inside the frame, then download." }
            }

            if let FrameStatus::Failed(ref err) = frame_status() {
                p { class: "banner banner--error",
                    "The frame could not be loaded ({err}). Reload the page to try again."
                }
            }

            main { class: "app__main",
                EditorView {
                    canvas,
                    frame_url,
                    frame_failed: matches!(frame_status(), FrameStatus::Failed(_)),
                    photo_url: photo_url(),
                    placement,
                    on_wheel: move |delta_y| session.write().wheel(delta_y),
                    on_touch_start: move |touches: Vec<twibbon_core::TouchPoint>| {
                        session.write().touch_start(&touches);
                    },
                    on_touch_move: move |touches: Vec<twibbon_core::TouchPoint>| {
                        session.write().touch_move(&touches);
                    },
                    on_touch_end: move |remaining| session.write().touch_end(remaining),
                    on_drag: move |(dx, dy)| {
                        if let Some(position) = session.write().drag(dx, dy) {
                            tracing::trace!(x = position.x, y = position.y, "position changed");
                        }
                    },
                }

                div { class: "app__controls",
                    FileUpload { on_upload, error: upload_error() }
                    ZoomSlider {
                        value: transform.scale,
                        bounds,
                        step: slider_step,
                        disabled: !has_image,
                        on_input: move |v| session.write().set_slider(v),
                    }
                    ExportPanel { ready, busy: exporting(), on_export }
                }
            }
        }
    }
}
