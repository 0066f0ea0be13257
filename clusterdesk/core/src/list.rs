//! Cluster list: paging, filters, and soft-delete/restore/edit actions.
//!
//! Fetches are stamped with a sequence number and only the most recent one is
//! applied. Rows are never patched in place after a mutation; a successful
//! change always triggers a refetch of the current page.

use clusterdesk_proto::prelude::*;

use crate::cascade::{Applied, LocationCascade};
use crate::error::{CascadeError, FormError, FormField, GatewayError, ListError};
use crate::gateway::ClusterGateway;

/// Stamp of one outgoing page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub filters: FilterCriteria,
    seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SoftDelete(ClusterId),
    Restore(ClusterId),
    Update(ClusterId, ClusterPatch),
}

impl Mutation {
    pub fn cluster_id(&self) -> ClusterId {
        match self {
            Mutation::SoftDelete(id) | Mutation::Restore(id) | Mutation::Update(id, _) => *id,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Mutation::SoftDelete(_) => "delete",
            Mutation::Restore(_) => "restore",
            Mutation::Update(..) => "update",
        }
    }

    /// Issue the matching gateway call. Updates discard the returned cluster
    /// because the page is refetched afterwards.
    pub async fn send<G: ClusterGateway + ?Sized>(&self, gateway: &G) -> Result<(), GatewayError> {
        match self {
            Mutation::SoftDelete(id) => gateway.soft_delete_cluster(*id).await,
            Mutation::Restore(id) => gateway.restore_cluster(*id).await,
            Mutation::Update(id, patch) => gateway.update_cluster(*id, patch).await.map(|_| ()),
        }
    }
}

/// An accepted mutation waiting for its response.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationTicket {
    pub mutation: Mutation,
}

/// The cluster currently open in the edit dialog and its pending changes.
///
/// Location is picked through the session's own [`LocationCascade`]. Each
/// level's id and name enter the patch together, straight from the loaded
/// option lists, so a patch never pairs an id with another place's name.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub cluster: Cluster,
    pub patch: ClusterPatch,
    pub cascade: LocationCascade,
    relocated: bool,
}

impl EditSession {
    pub fn new(cluster: &Cluster) -> Self {
        let mut cascade = LocationCascade::new();
        if let Some(country) = cluster.country_id {
            cascade.select_country(country);
            if let Some(state) = cluster.state_id {
                if cascade.select_state(state).is_ok() {
                    if let Some(city) = cluster.city_id {
                        cascade.select_city(city).ok();
                    }
                }
            }
        }
        Self {
            cluster: cluster.clone(),
            patch: ClusterPatch::from(cluster),
            cascade,
            relocated: false,
        }
    }

    /// Whether the location was changed in this session.
    pub fn is_relocated(&self) -> bool {
        self.relocated
    }

    pub fn select_country(&mut self, id: LocationId) {
        self.cascade.select_country(id);
        self.relocated = true;
        let (id, name) = self.picked(FormField::Country);
        self.patch.country_id = id;
        self.patch.country_name = name;
        self.sync_state();
    }

    pub fn select_state(&mut self, id: LocationId) -> Result<(), CascadeError> {
        self.cascade.select_state(id)?;
        self.relocated = true;
        self.sync_state();
        Ok(())
    }

    pub fn select_city(&mut self, id: LocationId) -> Result<(), CascadeError> {
        self.cascade.select_city(id)?;
        self.relocated = true;
        self.sync_city();
        Ok(())
    }

    fn sync_state(&mut self) {
        let (id, name) = self.picked(FormField::State);
        self.patch.state_id = id;
        self.patch.state_name = name;
        self.sync_city();
    }

    fn sync_city(&mut self) {
        let (id, name) = self.picked(FormField::City);
        self.patch.city_id = id;
        self.patch.city_name = name;
    }

    /// Id and name of one level, or neither when the name is not loaded.
    fn picked(&self, field: FormField) -> (Option<LocationId>, Option<String>) {
        let (slot, name) = match field {
            FormField::Country => (self.cascade.country(), self.cascade.country_name()),
            FormField::State => (self.cascade.state(), self.cascade.state_name()),
            _ => (self.cascade.city(), self.cascade.city_name()),
        };
        match (slot.id(), name) {
            (Some(id), Some(name)) => (Some(id), Some(name.to_string())),
            _ => (None, None),
        }
    }

    /// The patch to send. After a location change all three levels must be
    /// picked again.
    pub fn submission(&self) -> Result<ClusterPatch, FormError> {
        if self.relocated {
            let missing: Vec<FormField> = [
                (FormField::Country, self.patch.country_id),
                (FormField::State, self.patch.state_id),
                (FormField::City, self.patch.city_id),
            ]
            .into_iter()
            .filter(|(_, id)| id.is_none())
            .map(|(field, _)| field)
            .collect();
            if !missing.is_empty() {
                return Err(FormError::Required(missing));
            }
        }
        Ok(self.patch.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterList {
    page: u64,
    draft_filters: FilterCriteria,
    applied_filters: FilterCriteria,
    /// Page and filters of the rows on display.
    shown_page: u64,
    shown_filters: FilterCriteria,
    rows: Vec<Cluster>,
    visible: Vec<Cluster>,
    total: u64,
    seq: u64,
    loading: bool,
    error: Option<GatewayError>,
    pending: Option<Mutation>,
    notice: Option<String>,
    editing: Option<EditSession>,
}

impl Default for ClusterList {
    fn default() -> Self {
        Self {
            page: 1,
            draft_filters: FilterCriteria::default(),
            applied_filters: FilterCriteria::default(),
            shown_page: 1,
            shown_filters: FilterCriteria::default(),
            rows: Vec::new(),
            visible: Vec::new(),
            total: 0,
            seq: 0,
            loading: false,
            error: None,
            pending: None,
            notice: None,
            editing: None,
        }
    }
}

impl ClusterList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current 1-based page.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Filter values as currently edited; not yet sent.
    pub fn filters(&self) -> &FilterCriteria {
        &self.draft_filters
    }

    /// Filter values used by the latest fetch.
    pub fn applied_filters(&self) -> &FilterCriteria {
        &self.applied_filters
    }

    /// Server-reported total; the only input to page math.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.total, PAGE_SIZE)
    }

    /// Rows as the server returned them.
    pub fn server_rows(&self) -> &[Cluster] {
        &self.rows
    }

    /// Rows after the client-side filter pass; what gets rendered.
    pub fn rows(&self) -> &[Cluster] {
        &self.visible
    }

    /// Visible rows with their serial number across pages.
    pub fn numbered_rows(&self) -> impl Iterator<Item = (u64, &Cluster)> + '_ {
        let offset = (self.page.saturating_sub(1)) * PAGE_SIZE;
        self.visible
            .iter()
            .enumerate()
            .map(move |(i, c)| (offset + i as u64 + 1, c))
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&GatewayError> {
        self.error.as_ref()
    }

    /// Message from the last failed mutation.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&Mutation> {
        self.pending.as_ref()
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut EditSession> {
        self.editing.as_mut()
    }

    /// Merge into the edited filters without fetching.
    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.draft_filters.merge(patch);
    }

    /// Commit the edited filters and go back to page 1.
    pub fn apply_filters(&mut self) -> PageRequest {
        self.applied_filters = self.draft_filters.clone();
        self.page = 1;
        self.request()
    }

    pub fn set_page(&mut self, page: u64) -> PageRequest {
        self.page = page.max(1);
        self.request()
    }

    /// Re-request the current page with the applied filters.
    pub fn refetch(&mut self) -> PageRequest {
        self.request()
    }

    fn request(&mut self) -> PageRequest {
        self.seq += 1;
        self.loading = true;
        PageRequest {
            page: self.page,
            filters: self.applied_filters.clone(),
            seq: self.seq,
        }
    }

    /// Apply a page response if it belongs to the latest request.
    pub fn complete(
        &mut self,
        request: PageRequest,
        result: Result<ClusterPage, GatewayError>,
    ) -> Applied {
        if request.seq != self.seq {
            log::debug!(
                "discarding stale page {} response (seq {} < {})",
                request.page,
                request.seq,
                self.seq
            );
            return Applied::Discarded;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.visible = request.filters.apply(&page.data);
                if self.visible.len() != page.data.len() {
                    log::debug!(
                        "client filter dropped {} of {} rows on page {}",
                        page.data.len() - self.visible.len(),
                        page.data.len(),
                        request.page
                    );
                }
                self.rows = page.data;
                self.total = page.total;
                self.error = None;
                self.shown_page = request.page;
                self.shown_filters = request.filters;
            }
            Err(err) => {
                log::warn!("failed to load clusters page {}: {err}", request.page);
                self.page = self.shown_page;
                self.applied_filters = self.shown_filters.clone();
                self.error = Some(err);
            }
        }
        Applied::Applied
    }

    /// Accept a mutation unless another one is still outstanding.
    pub fn begin_mutation(&mut self, mutation: Mutation) -> Option<MutationTicket> {
        if self.pending.is_some() {
            log::debug!("ignoring {} while another change is pending", mutation.verb());
            return None;
        }
        self.pending = Some(mutation.clone());
        self.notice = None;
        Some(MutationTicket { mutation })
    }

    /// Record a mutation result. On success the edit dialog closes and the
    /// returned request refetches the current page.
    pub fn finish_mutation(
        &mut self,
        ticket: MutationTicket,
        result: Result<(), GatewayError>,
    ) -> Option<PageRequest> {
        self.pending = None;
        let verb = ticket.mutation.verb();
        let id = ticket.mutation.cluster_id();
        match result {
            Ok(()) => {
                log::info!("{verb} of cluster {id} succeeded");
                if matches!(ticket.mutation, Mutation::Update(..)) {
                    self.editing = None;
                }
                Some(self.refetch())
            }
            Err(err) => {
                log::warn!("{verb} of cluster {id} failed: {err}");
                self.notice = Some(
                    err.server_message()
                        .filter(|m| !m.is_empty())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Failed to {verb} cluster: {err}")),
                );
                None
            }
        }
    }

    pub fn open_edit(&mut self, cluster: &Cluster) {
        self.editing = Some(EditSession::new(cluster));
    }

    /// Accept the open edit dialog as an update. `Ok(None)` when no dialog
    /// is open; an incomplete location is reported through [`Self::notice`].
    pub fn begin_edit_submit(&mut self) -> Result<Option<MutationTicket>, ListError> {
        let Some(session) = &self.editing else {
            return Ok(None);
        };
        let id = session.cluster.id;
        let patch = match session.submission() {
            Ok(patch) => patch,
            Err(err) => {
                self.notice = Some(format!("Cannot save cluster: {err}"));
                return Err(err.into());
            }
        };
        self.begin_mutation(Mutation::Update(id, patch))
            .map(Some)
            .ok_or(ListError::Busy)
    }

    pub fn close_edit(&mut self) {
        self.editing = None;
    }

    /// Fetch and run one page request.
    pub async fn load<G: ClusterGateway + ?Sized>(
        &mut self,
        gateway: &G,
        request: PageRequest,
    ) -> Applied {
        let result = gateway.list_clusters(request.page, &request.filters).await;
        self.complete(request, result)
    }

    async fn run_mutation<G: ClusterGateway + ?Sized>(
        &mut self,
        gateway: &G,
        mutation: Mutation,
    ) -> Result<(), ListError> {
        let ticket = self.begin_mutation(mutation).ok_or(ListError::Busy)?;
        self.run_ticket(gateway, ticket).await
    }

    async fn run_ticket<G: ClusterGateway + ?Sized>(
        &mut self,
        gateway: &G,
        ticket: MutationTicket,
    ) -> Result<(), ListError> {
        let result = ticket.mutation.send(gateway).await;
        let outcome = result.clone();
        if let Some(request) = self.finish_mutation(ticket, result) {
            self.load(gateway, request).await;
        }
        outcome.map_err(ListError::from)
    }

    pub async fn delete_selected<G: ClusterGateway + ?Sized>(
        &mut self,
        gateway: &G,
        cluster: &Cluster,
    ) -> Result<(), ListError> {
        self.run_mutation(gateway, Mutation::SoftDelete(cluster.id))
            .await
    }

    pub async fn restore_selected<G: ClusterGateway + ?Sized>(
        &mut self,
        gateway: &G,
        cluster: &Cluster,
    ) -> Result<(), ListError> {
        self.run_mutation(gateway, Mutation::Restore(cluster.id))
            .await
    }

    pub async fn edit_selected<G: ClusterGateway + ?Sized>(
        &mut self,
        gateway: &G,
        cluster: &Cluster,
        patch: ClusterPatch,
    ) -> Result<(), ListError> {
        self.run_mutation(gateway, Mutation::Update(cluster.id, patch))
            .await
    }

    /// Load a cluster by id from the server and open it for editing.
    pub async fn open_edit_by_id<G: ClusterGateway + ?Sized>(
        &mut self,
        gateway: &G,
        id: ClusterId,
    ) -> Result<(), ListError> {
        let cluster = gateway.show_cluster(id).await?;
        self.open_edit(&cluster);
        Ok(())
    }

    /// Load the edit dialog's country, state and city lists.
    pub async fn load_edit_locations<G: ClusterGateway + ?Sized>(&mut self, gateway: &G) {
        let Some(session) = self.editing.as_mut() else {
            return;
        };
        session.cascade.load_countries(gateway).await;
        session.cascade.load_states(gateway).await;
        session.cascade.load_cities(gateway).await;
    }

    /// Submit the open edit dialog, if any.
    pub async fn submit_edit<G: ClusterGateway + ?Sized>(
        &mut self,
        gateway: &G,
    ) -> Result<(), ListError> {
        match self.begin_edit_submit()? {
            Some(ticket) => self.run_ticket(gateway, ticket).await,
            None => Ok(()),
        }
    }
}
