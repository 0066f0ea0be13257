use clusterdesk_core::GatewayError;
use dioxus::prelude::*;
use std::future::Future;

use crate::api::Gateway;

/// State of one gateway call.
#[derive(Clone)]
pub struct ApiState<T: Clone + 'static> {
    pub loading: Signal<bool>,
    pub data: Signal<Option<Result<T, GatewayError>>>,
}

impl<T: Clone + 'static> ApiState<T> {
    #[inline]
    pub fn is_loading(&self) -> bool {
        *self.loading.read()
    }
}

/// The gateway provided by `App`.
pub fn use_gateway() -> Gateway {
    use_context::<Gateway>()
}

/// Run `fetch_fn` once the component mounts, and again whenever a signal it
/// reads changes.
///
/// ```rust
/// let countries = use_api(move || {
///     let gateway = gateway.clone();
///     async move { gateway.list_countries().await }
/// });
/// ```
pub fn use_api<T, F, Fut>(mut fetch_fn: F) -> ApiState<T>
where
    T: Clone + 'static,
    F: FnMut() -> Fut + 'static,
    Fut: Future<Output = Result<T, GatewayError>> + 'static,
{
    let state = ApiState {
        loading: use_signal(|| false),
        data: use_signal(|| None),
    };

    use_effect(move || {
        let mut loading = state.loading;
        let mut data = state.data;
        let result_future = fetch_fn();
        spawn(async move {
            *loading.write() = true;
            let result = result_future.await;
            *data.write() = Some(result);
            *loading.write() = false;
        });
    });

    state
}
