use clusterdesk_core::{
    ClusterGateway, ClusterList, GatewayError, ListKind, Mutation, MutationTicket, PageRequest,
};
use clusterdesk_proto::prelude::{Cluster, FilterPatch, LocationId};
use dioxus::prelude::*;

use crate::api::Gateway;
use crate::components::feedback::{EmptyState, ErrorState, LoadingState, Notice};
use crate::components::fields::{LocationSelect, TextField};
use crate::components::layout::{Card, PageContainer, PageHeader};
use crate::components::pagination::Pagination;
use crate::components::table_view::TableView;
use crate::hooks::{use_api, use_gateway};

const HEADERS: [&str; 8] = ["SL No", "Name", "Email", "Country", "State", "City", "Location", "Status"];

fn fetch_page(mut list: Signal<ClusterList>, gateway: Gateway, request: PageRequest) {
    spawn(async move {
        let result = gateway.list_clusters(request.page, &request.filters).await;
        list.write().complete(request, result);
    });
}

fn run_mutation(mut list: Signal<ClusterList>, gateway: Gateway, mutation: Mutation) {
    let Some(ticket) = list.write().begin_mutation(mutation) else {
        return;
    };
    run_ticket(list, gateway, ticket);
}

fn run_ticket(mut list: Signal<ClusterList>, gateway: Gateway, ticket: MutationTicket) {
    spawn(async move {
        let result = ticket.mutation.send(&gateway).await;
        let refetch = list.write().finish_mutation(ticket, result);
        if let Some(request) = refetch {
            let result = gateway.list_clusters(request.page, &request.filters).await;
            list.write().complete(request, result);
        }
    });
}

/// Open the edit dialog on the server's copy of `cluster`, falling back to
/// the row data when the lookup fails.
fn open_edit(mut list: Signal<ClusterList>, gateway: Gateway, cluster: Cluster) {
    spawn(async move {
        match gateway.show_cluster(cluster.id).await {
            Ok(fresh) => list.write().open_edit(&fresh),
            Err(err) => {
                log::warn!("failed to load cluster {}: {err}", cluster.id);
                list.write().open_edit(&cluster);
            }
        }
        for kind in [ListKind::Countries, ListKind::States, ListKind::Cities] {
            load_edit_options(list, gateway.clone(), kind);
        }
    });
}

/// Fill one dropdown of the open edit dialog. The response is dropped if
/// the dialog was closed or reopened on another cluster meanwhile.
fn load_edit_options(mut list: Signal<ClusterList>, gateway: Gateway, kind: ListKind) {
    let issued = list.write().editing_mut().and_then(|s| {
        let stale = s.cascade.take_superseded();
        gateway.invalidate_locations(&stale);
        let ticket = match kind {
            ListKind::Countries => Some(s.cascade.request_countries()),
            ListKind::States => s.cascade.request_states(),
            ListKind::Cities => s.cascade.request_cities(),
        }?;
        Some((s.cluster.id, ticket))
    });
    let Some((id, ticket)) = issued else {
        return;
    };
    spawn(async move {
        let result = match ticket.kind {
            ListKind::Countries => gateway.list_countries().await,
            ListKind::States => gateway.list_states_for(ticket.parent).await,
            ListKind::Cities => gateway.list_cities_for(ticket.parent).await,
        };
        if let Some(s) = list.write().editing_mut().filter(|s| s.cluster.id == id) {
            s.cascade.complete(ticket, result);
        }
    });
}

fn status_text(cluster: &Cluster) -> String {
    match cluster.deleted_at_utc() {
        Some(at) => format!("deleted {}", at.format("%Y-%m-%d %H:%M")),
        None => cluster.status_label(),
    }
}

fn table_rows(list: &ClusterList) -> Vec<Vec<String>> {
    list.numbered_rows()
        .map(|(n, c)| {
            vec![
                n.to_string(),
                c.name.clone(),
                c.email.clone(),
                c.country_name.clone(),
                c.state_name.clone(),
                c.city_name.clone(),
                c.location.clone(),
                status_text(c),
            ]
        })
        .collect()
}

#[component]
pub fn Clusters() -> Element {
    let gateway = use_gateway();
    let mut list = use_signal(ClusterList::new);
    let mut selected = use_signal(|| None::<usize>);
    let countries = use_api({
        let gateway = gateway.clone();
        move || {
            let gateway = gateway.clone();
            async move { gateway.list_countries().await }
        }
    });

    use_effect({
        let gateway = gateway.clone();
        move || {
            let request = list.write().refetch();
            fetch_page(list, gateway.clone(), request);
        }
    });

    let apply = {
        let gateway = gateway.clone();
        move |_| {
            selected.set(None);
            let request = list.write().apply_filters();
            fetch_page(list, gateway.clone(), request);
        }
    };

    let go_to = {
        let gateway = gateway.clone();
        move |page: u64| {
            selected.set(None);
            let request = list.write().set_page(page);
            fetch_page(list, gateway.clone(), request);
        }
    };

    let state = list.read().clone();
    let filters = state.filters().clone();
    let country_names: Vec<String> = match countries.data.read().as_ref() {
        Some(Ok(nodes)) => nodes.iter().map(|n| n.name.clone()).collect(),
        _ => Vec::new(),
    };
    let picked = (*selected.read()).and_then(|i| state.rows().get(i).cloned());

    rsx! {
        PageContainer {
            PageHeader {
                title: "Clusters".to_string(),
                subtitle: Some("Search, edit, delete and restore clusters".to_string())
            }

            Card {
                title: "Filters",
                div {
                    class: "grid grid-cols-1 md:grid-cols-5 gap-4 items-end",
                    TextField {
                        label: "Cluster name",
                        value: filters.cluster_name.clone(),
                        oninput: move |v: String| list.write().set_filter(FilterPatch::default().cluster_name(v)),
                    }
                    label {
                        class: "block space-y-1",
                        span { class: "text-sm font-medium text-gray-700", "Country" }
                        select {
                            class: "w-full px-3 py-2 rounded border border-gray-300 bg-white text-sm",
                            disabled: countries.is_loading(),
                            value: "{filters.country_name}",
                            onchange: move |ev: FormEvent| list.write().set_filter(FilterPatch::default().country_name(ev.value())),
                            option { value: "", "All countries" }
                            for name in country_names.iter() {
                                option {
                                    key: "{name}",
                                    value: "{name}",
                                    selected: *name == filters.country_name,
                                    "{name}"
                                }
                            }
                        }
                    }
                    TextField {
                        label: "State",
                        value: filters.state_name.clone(),
                        oninput: move |v: String| list.write().set_filter(FilterPatch::default().state_name(v)),
                    }
                    TextField {
                        label: "City",
                        value: filters.city_name.clone(),
                        oninput: move |v: String| list.write().set_filter(FilterPatch::default().city_name(v)),
                    }
                    button {
                        r#type: "button",
                        class: "px-6 py-2 bg-blue-600 text-white rounded-md font-medium hover:bg-blue-700 transition-colors",
                        onclick: apply,
                        "Filter"
                    }
                }
            }

            Card {
                title: "Cluster List",
                header_right: Some(rsx! { span { "{state.total()} clusters" } }),
                div {
                    class: "space-y-4",
                    if let Some(notice) = state.notice() {
                        Notice { message: notice.to_string() }
                    }
                    if let Some(err) = state.error() {
                        ErrorState { error: err.to_string(), title: Some("Failed to load clusters".to_string()) }
                    }
                    if state.is_loading() && state.is_empty() {
                        LoadingState { message: Some("Loading clusters...".to_string()) }
                    } else if state.is_empty() {
                        EmptyState { message: "No data found".to_string() }
                    } else {
                        TableView {
                            headers: HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
                            data: table_rows(&state),
                            selected: *selected.read(),
                            on_row_click: Some(EventHandler::new(move |idx: usize| selected.set(Some(idx)))),
                        }
                    }
                    if let Some(cluster) = picked {
                        RowActions { list: list, cluster: cluster }
                    }
                    Pagination {
                        page: state.page(),
                        total_pages: state.total_pages(),
                        disabled: state.is_loading(),
                        onpage: go_to,
                    }
                }
            }

            EditDialog { list: list }
        }
    }
}

#[component]
fn RowActions(list: Signal<ClusterList>, cluster: Cluster) -> Element {
    let gateway = use_gateway();
    let busy = list.read().is_busy();
    let id = cluster.id;
    let deleted = cluster.is_deleted();

    let edit = {
        let gateway = gateway.clone();
        let cluster = cluster.clone();
        move |_| open_edit(list, gateway.clone(), cluster.clone())
    };

    let toggle = {
        let gateway = gateway.clone();
        move |_| {
            let mutation = if deleted { Mutation::Restore(id) } else { Mutation::SoftDelete(id) };
            run_mutation(list, gateway.clone(), mutation);
        }
    };

    rsx! {
        div {
            class: "flex items-center justify-between px-4 py-3 bg-gray-50 border border-gray-200 rounded",
            span { class: "text-sm text-gray-700", "Selected: {cluster.name}" }
            div {
                class: "flex items-center gap-2",
                button {
                    class: "px-3 py-1 text-sm rounded bg-gray-100 hover:bg-gray-200",
                    disabled: busy,
                    onclick: edit,
                    "Edit"
                }
                button {
                    class: if deleted {
                        "px-3 py-1 text-sm rounded bg-green-100 text-green-800 hover:bg-green-200"
                    } else {
                        "px-3 py-1 text-sm rounded bg-red-100 text-red-800 hover:bg-red-200"
                    },
                    disabled: busy,
                    onclick: toggle,
                    if busy { "Working..." } else if deleted { "Restore" } else { "Delete" }
                }
            }
        }
    }
}

#[component]
fn EditDialog(mut list: Signal<ClusterList>) -> Element {
    let gateway = use_gateway();
    let Some(session) = list.read().editing().cloned() else {
        return rsx! {};
    };
    let busy = list.read().is_busy();
    let patch = session.patch;
    let cascade = session.cascade;
    let list_error = |error: &Option<GatewayError>| error.as_ref().map(|e| e.to_string());

    let on_country = {
        let gateway = gateway.clone();
        move |id: LocationId| {
            if let Some(s) = list.write().editing_mut() {
                s.select_country(id);
            }
            load_edit_options(list, gateway.clone(), ListKind::States);
        }
    };

    let on_state = {
        let gateway = gateway.clone();
        move |id: LocationId| {
            let selected = list.write().editing_mut().map(|s| s.select_state(id));
            match selected {
                Some(Ok(())) => load_edit_options(list, gateway.clone(), ListKind::Cities),
                Some(Err(err)) => log::warn!("{err}"),
                None => {}
            }
        }
    };

    let on_city = move |id: LocationId| {
        let selected = list.write().editing_mut().map(|s| s.select_city(id));
        if let Some(Err(err)) = selected {
            log::warn!("{err}");
        }
    };

    let save = move |_| {
        let begun = list.write().begin_edit_submit();
        match begun {
            Ok(Some(ticket)) => run_ticket(list, gateway.clone(), ticket),
            Ok(None) => {}
            Err(err) => log::debug!("edit not sent: {err}"),
        }
    };

    rsx! {
        div { class: "fixed inset-0 z-50 flex items-center justify-center",
            div { class: "absolute inset-0 bg-black/50", onclick: move |_| list.write().close_edit() }
            div { class: "relative bg-white rounded-lg shadow-lg max-w-2xl w-[90vw] max-h-[80vh] overflow-auto p-6 space-y-4",
                div { class: "flex items-center justify-between",
                    h3 { class: "text-lg font-semibold text-gray-900", "Edit {session.cluster.name}" }
                    button { class: "px-3 py-1 text-sm rounded bg-gray-100 hover:bg-gray-200",
                        onclick: move |_| list.write().close_edit(),
                        "Close"
                    }
                }
                if let Some(notice) = list.read().notice() {
                    Notice { message: notice.to_string() }
                }
                div { class: "grid grid-cols-1 md:grid-cols-2 gap-4",
                    TextField {
                        label: "Name",
                        value: patch.name.clone().unwrap_or_default(),
                        oninput: move |v: String| if let Some(s) = list.write().editing_mut() { s.patch.name = Some(v) },
                    }
                    TextField {
                        label: "Email",
                        kind: "email",
                        value: patch.email.clone().unwrap_or_default(),
                        oninput: move |v: String| if let Some(s) = list.write().editing_mut() { s.patch.email = Some(v) },
                    }
                    LocationSelect {
                        label: "Country",
                        placeholder: "Select country",
                        options: cascade.countries().items.clone(),
                        selected: cascade.country().id(),
                        disabled: busy,
                        loading: cascade.countries().loading,
                        error: list_error(&cascade.countries().error),
                        onselect: on_country,
                    }
                    LocationSelect {
                        label: "State",
                        placeholder: "Select state",
                        options: cascade.states().items.clone(),
                        selected: cascade.state().id(),
                        disabled: busy || !cascade.country().is_selected(),
                        loading: cascade.states().loading,
                        error: list_error(&cascade.states().error),
                        onselect: on_state,
                    }
                    LocationSelect {
                        label: "City",
                        placeholder: "Select city",
                        options: cascade.cities().items.clone(),
                        selected: cascade.city().id(),
                        disabled: busy || !cascade.state().is_selected(),
                        loading: cascade.cities().loading,
                        error: list_error(&cascade.cities().error),
                        onselect: on_city,
                    }
                    TextField {
                        label: "Location",
                        value: patch.location.clone().unwrap_or_default(),
                        oninput: move |v: String| if let Some(s) = list.write().editing_mut() { s.patch.location = Some(v) },
                    }
                }
                div { class: "flex justify-end gap-2",
                    button { class: "px-4 py-2 text-sm rounded bg-gray-100 hover:bg-gray-200",
                        onclick: move |_| list.write().close_edit(),
                        "Cancel"
                    }
                    button { class: "px-4 py-2 text-sm rounded bg-blue-600 text-white hover:bg-blue-700 disabled:opacity-50",
                        disabled: busy,
                        onclick: save,
                        if busy { "Saving..." } else { "Save" }
                    }
                }
            }
        }
    }
}
