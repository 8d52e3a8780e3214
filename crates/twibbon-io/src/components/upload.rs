//! Photo picker: file input plus a drop zone.
//!
//! The picker is emptied after every read so choosing the same photo
//! again still fires `change` and re-runs the fit.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use wasm_bindgen::JsCast;

/// DOM id of the hidden file input.
const PICKER_ID: &str = "photo-picker";

/// Photo formats the decoder was built with.
const PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp", "gif"];

/// Reject a selection by name before reading it.
///
/// Drops bypass the picker's `accept="image/*"` filter, so the
/// extension is checked here.
fn check_name(name: &str) -> Result<(), String> {
    let known = name.rsplit_once('.').is_some_and(|(_, ext)| {
        PHOTO_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    });
    if known {
        Ok(())
    } else {
        Err(format!("{name} is not a supported photo"))
    }
}

/// Reject a read that produced no bytes.
fn check_contents(name: &str, bytes: &[u8]) -> Result<(), String> {
    if bytes.is_empty() {
        Err(format!("{name} is empty"))
    } else {
        Ok(())
    }
}

/// Empty the file input so re-selecting the same file is reported.
fn clear_picker() {
    let input = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(PICKER_ID))
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok());
    match input {
        Some(input) => input.set_value(""),
        None => tracing::debug!(id = PICKER_ID, "photo picker not in the DOM"),
    }
}

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Called with the photo bytes and file name once read.
    on_upload: EventHandler<(Vec<u8>, String)>,
    /// Message shown when the app rejected the last photo (e.g. it did
    /// not decode).
    error: Option<String>,
}

/// Photo picker with a drop zone.
///
/// Only the first file of a selection is used.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut chosen = use_signal(|| Option::<String>::None);
    let mut rejected = use_signal(|| Option::<String>::None);

    let read_photo = move |files: Vec<FileData>| async move {
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        if let Err(reason) = check_name(&name) {
            rejected.set(Some(reason));
            return;
        }
        let bytes = match file.read_bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                rejected.set(Some(format!("Could not read {name}: {e}")));
                return;
            }
        };
        if let Err(reason) = check_contents(&name, &bytes) {
            rejected.set(Some(reason));
            return;
        }
        chosen.set(Some(name.clone()));
        rejected.set(None);
        props.on_upload.call((bytes.to_vec(), name));
    };

    let on_pick = move |evt: FormEvent| async move {
        read_photo(evt.files()).await;
        clear_picker();
    };

    let on_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        read_photo(evt.files()).await;
    };

    let zone_class = if dragging() {
        "upload upload--active"
    } else {
        "upload"
    };
    let message = rejected().or(props.error);

    rsx! {
        div {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| dragging.set(false),
            ondrop: on_drop,

            if let Some(ref err) = message {
                p { class: "upload__error", "{err}" }
            } else if let Some(ref name) = chosen() {
                p { class: "upload__loaded", "Using {name}" }
            } else {
                p { class: "muted", "Drop a photo here or" }
            }

            label { class: "button",
                input {
                    id: PICKER_ID,
                    r#type: "file",
                    accept: "image/*",
                    class: "hidden",
                    onchange: on_pick,
                }
                "Choose Photo"
            }
        }
    }
}
