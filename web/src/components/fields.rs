use clusterdesk_proto::prelude::{LocationId, LocationNode};
use dioxus::prelude::*;

#[component]
pub fn TextField(
    label: &'static str,
    value: String,
    #[props(optional)] error: Option<String>,
    #[props(default = "text")] kind: &'static str,
    #[props(default = false)] disabled: bool,
    oninput: EventHandler<String>,
) -> Element {
    let border = if error.is_some() { "border-red-400" } else { "border-gray-300" };
    rsx! {
        label {
            class: "block space-y-1",
            span { class: "text-sm font-medium text-gray-700", "{label}" }
            input {
                r#type: kind,
                class: "w-full px-3 py-2 rounded border {border} bg-white text-sm disabled:bg-gray-100",
                value: "{value}",
                disabled: disabled,
                oninput: move |ev: FormEvent| oninput.call(ev.value()),
            }
            if let Some(error) = error {
                p { class: "text-xs text-red-600", "{error}" }
            }
        }
    }
}

/// Dropdown over one level of the location hierarchy.
#[component]
pub fn LocationSelect(
    label: &'static str,
    placeholder: &'static str,
    options: Vec<LocationNode>,
    selected: Option<LocationId>,
    disabled: bool,
    loading: bool,
    #[props(optional)] error: Option<String>,
    onselect: EventHandler<LocationId>,
) -> Element {
    let current = selected.map(|id| id.to_string()).unwrap_or_default();
    let border = if error.is_some() { "border-red-400" } else { "border-gray-300" };
    rsx! {
        label {
            class: "block space-y-1",
            span { class: "text-sm font-medium text-gray-700", "{label}" }
            select {
                class: "w-full px-3 py-2 rounded border {border} bg-white text-sm disabled:bg-gray-100",
                disabled: disabled || loading,
                value: "{current}",
                onchange: move |ev: FormEvent| {
                    if let Ok(id) = ev.value().parse::<LocationId>() {
                        onselect.call(id);
                    }
                },
                option {
                    value: "",
                    if loading { "Loading..." } else { "{placeholder}" }
                }
                for node in options.iter() {
                    option {
                        key: "{node.id}",
                        value: "{node.id}",
                        selected: selected == Some(node.id),
                        "{node.name}"
                    }
                }
            }
            if let Some(error) = error {
                p { class: "text-xs text-red-600", "{error}" }
            }
        }
    }
}
