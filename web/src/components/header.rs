use dioxus::prelude::*;
use dioxus_router::{use_route, Link};

use crate::app::Route;

#[component]
pub fn Header() -> Element {
    rsx! {
        header {
            class: "bg-white shadow-sm border-b border-gray-200",
            div {
                class: "px-6 py-4 flex items-center justify-between",
                Link {
                    to: Route::NewClusterPage {},
                    class: "text-xl font-bold text-gray-900 hover:text-blue-600",
                    "Cluster Admin"
                }
                nav {
                    class: "flex items-center space-x-1",
                    NavTab { to: Route::NewClusterPage {}, label: "New Cluster" }
                    NavTab { to: Route::ClustersPage {}, label: "Clusters" }
                }
            }
        }
    }
}

#[component]
pub fn NavTab(to: Route, label: &'static str) -> Element {
    let route = use_route::<Route>();

    let class_str = if route == to {
        "px-3 py-2 rounded-lg text-sm font-medium transition-colors bg-blue-100 text-blue-700 hover:bg-blue-200"
    } else {
        "px-3 py-2 rounded-lg text-sm font-medium transition-colors text-gray-700 hover:bg-gray-100 hover:text-gray-900"
    };

    rsx! {
        Link { to: to, class: class_str, "{label}" }
    }
}
