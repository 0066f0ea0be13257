use dioxus::prelude::*;

use crate::components::header::Header;

#[component]
pub fn AppLayout(children: Element) -> Element {
    rsx! {
        div {
            class: "min-h-screen bg-gray-50",
            Header {}
            main {
                class: "max-w-6xl mx-auto px-6 py-8",
                {children}
            }
        }
    }
}

#[component]
pub fn PageHeader(title: String, subtitle: Option<String>) -> Element {
    rsx! {
        div {
            class: "mb-8",
            h1 {
                class: "text-3xl font-bold text-gray-900",
                "{title}"
            }
            if let Some(subtitle) = subtitle {
                p {
                    class: "mt-2 text-gray-600",
                    "{subtitle}"
                }
            }
        }
    }
}

#[component]
pub fn PageContainer(children: Element) -> Element {
    rsx! {
        div {
            class: "space-y-6",
            {children}
        }
    }
}

/// White panel with a title row; `header_right` sits opposite the title.
#[component]
pub fn Card(
    title: &'static str,
    children: Element,
    #[props(optional)] header_right: Option<Element>,
) -> Element {
    rsx! {
        div {
            class: "bg-white rounded-lg shadow-sm border border-gray-200",
            div {
                class: "px-6 py-4 border-b border-gray-200 flex items-center justify-between gap-3",
                h3 { class: "text-lg font-semibold text-gray-900", "{title}" }
                if let Some(el) = header_right { div { class: "flex items-center gap-2 text-sm text-gray-600", {el} } }
            }
            div { class: "p-6", {children} }
        }
    }
}
