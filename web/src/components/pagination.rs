use dioxus::prelude::*;

#[component]
pub fn Pagination(page: u64, total_pages: u64, disabled: bool, onpage: EventHandler<u64>) -> Element {
    let last = total_pages.max(1);
    let btn_class = "px-3 py-1 text-sm rounded bg-gray-100 hover:bg-gray-200 disabled:opacity-50 disabled:cursor-not-allowed";
    rsx! {
        div {
            class: "flex items-center justify-between pt-4",
            button {
                class: btn_class,
                disabled: disabled || page <= 1,
                onclick: move |_| onpage.call(page.saturating_sub(1)),
                "Previous"
            }
            span { class: "text-sm text-gray-600", "Page {page} of {last}" }
            button {
                class: btn_class,
                disabled: disabled || page >= last,
                onclick: move |_| onpage.call(page + 1),
                "Next"
            }
        }
    }
}
