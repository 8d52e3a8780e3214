//! Zoom slider bound to the session's scale.

use dioxus::prelude::*;
use twibbon_core::ScaleBounds;

/// Props for the [`ZoomSlider`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ZoomSliderProps {
    /// Current scale.
    value: f64,
    /// Allowed range; the slider's min and max.
    bounds: ScaleBounds,
    /// Slider granularity.
    step: f64,
    /// Disables the control until a photo is loaded.
    disabled: bool,
    /// Called with the raw slider value; the session clamps it.
    on_input: EventHandler<f64>,
}

/// Labeled range input mirroring the current scale.
#[component]
pub fn ZoomSlider(props: ZoomSliderProps) -> Element {
    let ScaleBounds { min, max } = props.bounds;
    let value = props.value;
    let display = format!("{:.0}%", value * 100.0);

    rsx! {
        div { class: "zoom",
            div { class: "zoom__header",
                label { r#for: "zoom", "Zoom" }
                span { class: "zoom__value", "{display}" }
            }
            input {
                r#type: "range",
                id: "zoom",
                min: "{min}",
                max: "{max}",
                step: "{props.step}",
                value: "{value}",
                disabled: props.disabled,
                oninput: move |e| {
                    match e.value().parse::<f64>() {
                        Ok(v) => props.on_input.call(v),
                        Err(err) => {
                            web_sys::console::warn_1(
                                &format!("zoom slider parse failure: {err:?} from {:?}", e.value())
                                    .into(),
                            );
                        }
                    }
                },
            }
        }
    }
}
