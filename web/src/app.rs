use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use crate::api;
use crate::components::feedback::ErrorState;
use crate::components::layout::AppLayout;
use crate::pages::{clusters::Clusters, new_cluster::NewCluster};

#[derive(Routable, Clone, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/")]
    NewClusterPage {},
    #[route("/clusters")]
    ClustersPage {},
}

#[component]
pub fn NewClusterPage() -> Element {
    rsx! { AppLayout { NewCluster {} } }
}

#[component]
pub fn ClustersPage() -> Element {
    rsx! { AppLayout { Clusters {} } }
}

#[component]
pub fn App() -> Element {
    let startup_error = use_hook(|| match api::build_gateway() {
        Ok(gateway) => {
            provide_context(gateway);
            None
        }
        Err(err) => {
            log::error!("failed to set up cluster API: {err}");
            Some(err.to_string())
        }
    });

    if let Some(error) = startup_error {
        return rsx! {
            ErrorState { error, title: Some("Cluster API unavailable".to_string()) }
        };
    }

    rsx! {
        Router::<Route> {}
    }
}
