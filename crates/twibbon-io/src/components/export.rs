//! Export panel with the download button.

use dioxus::prelude::*;

/// Props for the [`ExportPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ExportPanelProps {
    /// Photo uploaded and frame loaded.
    ready: bool,
    /// An export is in flight.
    busy: bool,
    /// Called when the user asks for the download.
    on_export: EventHandler<()>,
}

/// Download button for the composed PNG.
///
/// The button stays clickable while not ready so the app can tell the
/// user what is missing.
#[component]
pub fn ExportPanel(props: ExportPanelProps) -> Element {
    let class = if props.ready {
        "button button--primary"
    } else {
        "button button--disabled"
    };
    let label = if props.busy {
        "Exporting…"
    } else {
        "Download"
    };

    rsx! {
        div { class: "export",
            button {
                class: "{class}",
                disabled: props.busy,
                onclick: move |_| props.on_export.call(()),
                "{label}"
            }
        }
    }
}
