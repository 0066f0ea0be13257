use clusterdesk_core::{ClusterForm, ClusterGateway, FormField, GatewayError, SubmitOutcome};
use clusterdesk_proto::prelude::LocationId;
use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::api::Gateway;
use crate::app::Route;
use crate::components::feedback::Notice;
use crate::components::fields::{LocationSelect, TextField};
use crate::components::layout::{Card, PageContainer, PageHeader};
use crate::hooks::use_gateway;

/// Drop cached lists whose parent the user just deselected.
fn evict_superseded(mut form: Signal<ClusterForm>, gateway: &Gateway) {
    let stale = form.write().cascade_mut().take_superseded();
    gateway.invalidate_locations(&stale);
}

fn load_countries(mut form: Signal<ClusterForm>, gateway: Gateway) {
    let ticket = form.write().cascade_mut().request_countries();
    spawn(async move {
        let result = gateway.list_countries().await;
        form.write().cascade_mut().complete(ticket, result);
    });
}

fn load_states(mut form: Signal<ClusterForm>, gateway: Gateway) {
    evict_superseded(form, &gateway);
    let Some(ticket) = form.write().cascade_mut().request_states() else {
        return;
    };
    spawn(async move {
        let result = gateway.list_states_for(ticket.parent).await;
        form.write().cascade_mut().complete(ticket, result);
    });
}

fn load_cities(mut form: Signal<ClusterForm>, gateway: Gateway) {
    evict_superseded(form, &gateway);
    let Some(ticket) = form.write().cascade_mut().request_cities() else {
        return;
    };
    spawn(async move {
        let result = gateway.list_cities_for(ticket.parent).await;
        form.write().cascade_mut().complete(ticket, result);
    });
}

#[component]
pub fn NewCluster() -> Element {
    let gateway = use_gateway();
    let mut form = use_signal(ClusterForm::new);
    let navigator = use_navigator();

    use_effect({
        let gateway = gateway.clone();
        move || load_countries(form, gateway.clone())
    });

    let on_country = {
        let gateway = gateway.clone();
        move |id: LocationId| {
            form.write().select_country(id);
            load_states(form, gateway.clone());
        }
    };

    let on_state = {
        let gateway = gateway.clone();
        move |id: LocationId| {
            let selected = form.write().select_state(id);
            match selected {
                Ok(()) => load_cities(form, gateway.clone()),
                Err(err) => log::warn!("{err}"),
            }
        }
    };

    let on_city = move |id: LocationId| {
        let selected = form.write().select_city(id);
        if let Err(err) = selected {
            log::warn!("{err}");
        }
    };

    let submit = {
        let gateway = gateway.clone();
        move |_| {
            let begun = form.write().begin_submit();
            let draft = match begun {
                Ok(draft) => draft,
                Err(err) => {
                    log::debug!("submit blocked: {err}");
                    return;
                }
            };
            let gateway = gateway.clone();
            spawn(async move {
                let result = gateway.create_cluster(&draft).await;
                let outcome = form.write().finish_submit(result);
                if let SubmitOutcome::Created(cluster) = outcome {
                    log::info!("created cluster {} ({})", cluster.id, cluster.name);
                    navigator.push(Route::ClustersPage {});
                }
            });
        }
    };

    let state = form.read().clone();
    let cascade = state.cascade();
    let field_error = |field: FormField| state.error_for(field).map(str::to_string);
    let list_error = |error: &Option<GatewayError>| error.as_ref().map(|e| e.to_string());

    rsx! {
        PageContainer {
            PageHeader {
                title: "Create Cluster".to_string(),
                subtitle: Some("Register a cluster and where it is located".to_string())
            }

            Card {
                title: "Cluster Details",
                div {
                    class: "space-y-4",
                    if let Some(notice) = state.notice() {
                        Notice { message: notice.to_string() }
                    }
                    div {
                        class: "grid grid-cols-1 md:grid-cols-2 gap-4",
                        TextField {
                            label: "Name",
                            value: state.name().to_string(),
                            error: field_error(FormField::Name),
                            oninput: move |v: String| form.write().set_name(v),
                        }
                        TextField {
                            label: "Email",
                            kind: "email",
                            value: state.email().to_string(),
                            error: field_error(FormField::Email),
                            oninput: move |v: String| form.write().set_email(v),
                        }
                        LocationSelect {
                            label: "Country",
                            placeholder: "Select country",
                            options: cascade.countries().items.clone(),
                            selected: cascade.country().id(),
                            disabled: false,
                            loading: cascade.countries().loading,
                            error: field_error(FormField::Country).or_else(|| list_error(&cascade.countries().error)),
                            onselect: on_country,
                        }
                        LocationSelect {
                            label: "State",
                            placeholder: "Select state",
                            options: cascade.states().items.clone(),
                            selected: cascade.state().id(),
                            disabled: !cascade.country().is_selected(),
                            loading: cascade.states().loading,
                            error: field_error(FormField::State).or_else(|| list_error(&cascade.states().error)),
                            onselect: on_state,
                        }
                        LocationSelect {
                            label: "City",
                            placeholder: "Select city",
                            options: cascade.cities().items.clone(),
                            selected: cascade.city().id(),
                            disabled: !cascade.state().is_selected(),
                            loading: cascade.cities().loading,
                            error: field_error(FormField::City).or_else(|| list_error(&cascade.cities().error)),
                            onselect: on_city,
                        }
                        TextField {
                            label: "Location",
                            value: state.location().to_string(),
                            error: field_error(FormField::Location),
                            oninput: move |v: String| form.write().set_location(v),
                        }
                    }
                    div {
                        class: "flex justify-end",
                        button {
                            r#type: "button",
                            class: format!("px-6 py-2 bg-blue-600 text-white rounded-md font-medium hover:bg-blue-700 transition-colors {}", if state.is_submitting() { "opacity-50 cursor-not-allowed" } else { "" }),
                            disabled: state.is_submitting(),
                            onclick: submit,
                            if state.is_submitting() { "Submitting..." } else { "Create Cluster" }
                        }
                    }
                }
            }
        }
    }
}
