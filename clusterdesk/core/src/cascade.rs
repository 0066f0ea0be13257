//! Country → state → city selection.
//!
//! Each slot is either unselected or holds an id. Changing a parent clears
//! every descendant. Option lists are loaded through [`FetchTicket`]s: a
//! ticket records the parent id and a per-list sequence number at send time,
//! and [`LocationCascade::complete`] drops any response whose ticket is no
//! longer current.
//!
//! A selection change also records the cached lists whose parent is no longer
//! selected. The `load_*` helpers hand them to
//! [`ClusterGateway::invalidate_locations`] before fetching; callers driving
//! tickets by hand drain them with [`LocationCascade::take_superseded`].

use clusterdesk_proto::prelude::{LocationId, LocationNode};

use crate::error::{CascadeError, GatewayError};
use crate::gateway::cache::CacheKey;
use crate::gateway::ClusterGateway;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Slot {
    #[default]
    Unselected,
    Selected(LocationId),
}

impl Slot {
    pub fn id(&self) -> Option<LocationId> {
        match self {
            Slot::Unselected => None,
            Slot::Selected(id) => Some(*id),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Slot::Selected(_))
    }
}

/// Which option list a ticket loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Countries,
    States,
    Cities,
}

/// Stamp of one outgoing location-list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub kind: ListKind,
    pub parent: Option<LocationId>,
    seq: u64,
}

/// Whether a completed response was applied or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Discarded,
}

/// Dropdown contents for one level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationOptions {
    pub items: Vec<LocationNode>,
    pub loading: bool,
    pub error: Option<GatewayError>,
    seq: u64,
}

impl LocationOptions {
    fn invalidate(&mut self) {
        self.seq += 1;
        self.items.clear();
        self.loading = false;
        self.error = None;
    }

    fn issue(&mut self) -> u64 {
        self.seq += 1;
        self.loading = true;
        self.error = None;
        self.seq
    }

    pub fn name_of(&self, id: LocationId) -> Option<&str> {
        self.items
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationCascade {
    country: Slot,
    state: Slot,
    city: Slot,
    countries: LocationOptions,
    states: LocationOptions,
    cities: LocationOptions,
    superseded: Vec<CacheKey>,
}

impl LocationCascade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn country(&self) -> Slot {
        self.country
    }

    pub fn state(&self) -> Slot {
        self.state
    }

    pub fn city(&self) -> Slot {
        self.city
    }

    pub fn countries(&self) -> &LocationOptions {
        &self.countries
    }

    pub fn states(&self) -> &LocationOptions {
        &self.states
    }

    pub fn cities(&self) -> &LocationOptions {
        &self.cities
    }

    /// Select a country. State and city are always reset, even when the
    /// same country is picked again.
    pub fn select_country(&mut self, id: LocationId) {
        if let Some(old) = self.country.id().filter(|old| *old != id) {
            self.supersede(CacheKey::States(old));
        }
        if let Some(old) = self.state.id() {
            self.supersede(CacheKey::Cities(old));
        }
        self.country = Slot::Selected(id);
        self.state = Slot::Unselected;
        self.city = Slot::Unselected;
        self.states.invalidate();
        self.cities.invalidate();
    }

    pub fn select_state(&mut self, id: LocationId) -> Result<(), CascadeError> {
        if !self.country.is_selected() {
            return Err(CascadeError::ParentNotSelected {
                child: "state",
                parent: "country",
            });
        }
        if let Some(old) = self.state.id().filter(|old| *old != id) {
            self.supersede(CacheKey::Cities(old));
        }
        self.state = Slot::Selected(id);
        self.city = Slot::Unselected;
        self.cities.invalidate();
        Ok(())
    }

    pub fn select_city(&mut self, id: LocationId) -> Result<(), CascadeError> {
        if !self.state.is_selected() {
            return Err(CascadeError::ParentNotSelected {
                child: "city",
                parent: "state",
            });
        }
        self.city = Slot::Selected(id);
        Ok(())
    }

    /// Clear all three selections. The country list is kept.
    pub fn reset(&mut self) {
        if let Some(old) = self.country.id() {
            self.supersede(CacheKey::States(old));
        }
        if let Some(old) = self.state.id() {
            self.supersede(CacheKey::Cities(old));
        }
        self.country = Slot::Unselected;
        self.state = Slot::Unselected;
        self.city = Slot::Unselected;
        self.states.invalidate();
        self.cities.invalidate();
    }

    fn supersede(&mut self, key: CacheKey) {
        if !self.superseded.contains(&key) {
            self.superseded.push(key);
        }
    }

    /// Cached lists whose parent was deselected since the last call.
    pub fn take_superseded(&mut self) -> Vec<CacheKey> {
        std::mem::take(&mut self.superseded)
    }

    pub fn request_countries(&mut self) -> FetchTicket {
        FetchTicket {
            kind: ListKind::Countries,
            parent: None,
            seq: self.countries.issue(),
        }
    }

    /// `None` while no country is selected: nothing should be fetched.
    pub fn request_states(&mut self) -> Option<FetchTicket> {
        let parent = self.country.id()?;
        Some(FetchTicket {
            kind: ListKind::States,
            parent: Some(parent),
            seq: self.states.issue(),
        })
    }

    /// `None` while no state is selected: nothing should be fetched.
    pub fn request_cities(&mut self) -> Option<FetchTicket> {
        let parent = self.state.id()?;
        Some(FetchTicket {
            kind: ListKind::Cities,
            parent: Some(parent),
            seq: self.cities.issue(),
        })
    }

    /// Apply a finished fetch unless a newer request or a parent change has
    /// superseded it.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<LocationNode>, GatewayError>,
    ) -> Applied {
        let (options, current_parent) = match ticket.kind {
            ListKind::Countries => (&mut self.countries, None),
            ListKind::States => (&mut self.states, self.country.id()),
            ListKind::Cities => (&mut self.cities, self.state.id()),
        };

        if ticket.seq != options.seq || ticket.parent != current_parent {
            log::debug!(
                "discarding stale {:?} response for parent {:?} (current {:?})",
                ticket.kind,
                ticket.parent,
                current_parent
            );
            return Applied::Discarded;
        }

        options.loading = false;
        match result {
            Ok(items) => {
                options.items = items;
                options.error = None;
            }
            Err(err) => {
                log::warn!("failed to load {:?}: {err}", ticket.kind);
                options.items.clear();
                options.error = Some(err);
            }
        }
        Applied::Applied
    }

    /// Name of the selected country, if its list has been loaded.
    pub fn country_name(&self) -> Option<&str> {
        self.countries.name_of(self.country.id()?)
    }

    pub fn state_name(&self) -> Option<&str> {
        self.states.name_of(self.state.id()?)
    }

    pub fn city_name(&self) -> Option<&str> {
        self.cities.name_of(self.city.id()?)
    }

    pub async fn load_countries<G: ClusterGateway + ?Sized>(&mut self, gateway: &G) -> Applied {
        gateway.invalidate_locations(&self.take_superseded());
        let ticket = self.request_countries();
        let result = gateway.list_countries().await;
        self.complete(ticket, result)
    }

    /// Fetch the states of the selected country; a no-op without one.
    pub async fn load_states<G: ClusterGateway + ?Sized>(
        &mut self,
        gateway: &G,
    ) -> Option<Applied> {
        gateway.invalidate_locations(&self.take_superseded());
        let ticket = self.request_states()?;
        let result = gateway.list_states_for(ticket.parent).await;
        Some(self.complete(ticket, result))
    }

    /// Fetch the cities of the selected state; a no-op without one.
    pub async fn load_cities<G: ClusterGateway + ?Sized>(
        &mut self,
        gateway: &G,
    ) -> Option<Applied> {
        gateway.invalidate_locations(&self.take_superseded());
        let ticket = self.request_cities()?;
        let result = gateway.list_cities_for(ticket.parent).await;
        Some(self.complete(ticket, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(names: &[(i64, &str)]) -> Vec<LocationNode> {
        names.iter().map(|(id, n)| LocationNode::new(*id, *n)).collect()
    }

    #[test]
    fn test_country_change_resets_descendants() {
        let mut c = LocationCascade::new();
        c.select_country(1);
        c.select_state(10).unwrap();
        c.select_city(100).unwrap();

        c.select_country(2);
        assert_eq!(c.country(), Slot::Selected(2));
        assert_eq!(c.state(), Slot::Unselected);
        assert_eq!(c.city(), Slot::Unselected);
    }

    #[test]
    fn test_selection_changes_report_superseded_lists() {
        let mut c = LocationCascade::new();
        c.select_country(1);
        c.select_state(10).unwrap();
        assert!(c.take_superseded().is_empty());

        c.select_state(10).unwrap();
        assert!(c.take_superseded().is_empty());

        c.select_country(1);
        assert_eq!(c.take_superseded(), vec![CacheKey::Cities(10)]);

        c.select_state(11).unwrap();
        c.select_country(2);
        c.select_country(3);
        assert_eq!(
            c.take_superseded(),
            vec![CacheKey::States(1), CacheKey::Cities(11), CacheKey::States(2)]
        );
        assert!(c.take_superseded().is_empty());
    }

    #[test]
    fn test_reselecting_same_country_still_resets() {
        let mut c = LocationCascade::new();
        c.select_country(1);
        c.select_state(10).unwrap();
        c.select_country(1);
        assert_eq!(c.state(), Slot::Unselected);
    }

    #[test]
    fn test_state_change_resets_city() {
        let mut c = LocationCascade::new();
        c.select_country(1);
        c.select_state(10).unwrap();
        c.select_city(100).unwrap();
        c.select_state(11).unwrap();
        assert_eq!(c.city(), Slot::Unselected);
        assert_eq!(c.state(), Slot::Selected(11));
    }

    #[test]
    fn test_child_requires_parent() {
        let mut c = LocationCascade::new();
        assert!(c.select_state(10).is_err());
        assert!(c.select_city(100).is_err());
        c.select_country(1);
        assert!(c.select_city(100).is_err());
        assert_eq!(c.city(), Slot::Unselected);
    }

    #[test]
    fn test_no_ticket_without_parent() {
        let mut c = LocationCascade::new();
        assert!(c.request_states().is_none());
        assert!(c.request_cities().is_none());
        c.select_country(1);
        assert!(c.request_states().is_some());
        assert!(c.request_cities().is_none());
    }

    #[test]
    fn test_stale_states_response_is_discarded() {
        let mut c = LocationCascade::new();
        c.select_country(1);
        let stale = c.request_states().unwrap();

        c.select_country(2);
        let fresh = c.request_states().unwrap();

        let applied = c.complete(stale, Ok(nodes(&[(10, "Goa")])));
        assert_eq!(applied, Applied::Discarded);
        assert!(c.states().items.is_empty());
        assert!(c.states().loading);

        let applied = c.complete(fresh, Ok(nodes(&[(20, "Bagmati")])));
        assert_eq!(applied, Applied::Applied);
        assert_eq!(c.states().items, nodes(&[(20, "Bagmati")]));
        assert!(!c.states().loading);
    }

    #[test]
    fn test_superseded_request_for_same_parent_is_discarded() {
        let mut c = LocationCascade::new();
        c.select_country(1);
        let first = c.request_states().unwrap();
        let second = c.request_states().unwrap();

        assert_eq!(c.complete(second, Ok(nodes(&[(10, "New")]))), Applied::Applied);
        assert_eq!(c.complete(first, Ok(nodes(&[(9, "Old")]))), Applied::Discarded);
        assert_eq!(c.states().items, nodes(&[(10, "New")]));
    }

    #[test]
    fn test_stale_cities_after_state_change() {
        let mut c = LocationCascade::new();
        c.select_country(1);
        c.select_state(10).unwrap();
        let stale = c.request_cities().unwrap();
        c.select_state(11).unwrap();
        assert_eq!(c.complete(stale, Ok(nodes(&[(100, "X")]))), Applied::Discarded);
        assert!(c.cities().items.is_empty());
    }

    #[test]
    fn test_failed_fetch_records_error() {
        let mut c = LocationCascade::new();
        let t = c.request_countries();
        let applied = c.complete(t, Err(GatewayError::Network("down".into())));
        assert_eq!(applied, Applied::Applied);
        assert!(c.countries().error.is_some());
        assert!(!c.countries().loading);
    }

    #[test]
    fn test_reset_keeps_countries() {
        let mut c = LocationCascade::new();
        let t = c.request_countries();
        c.complete(t, Ok(nodes(&[(1, "India")])));
        c.select_country(1);
        assert_eq!(c.country_name(), Some("India"));
        c.reset();
        assert_eq!(c.country(), Slot::Unselected);
        assert_eq!(c.countries().items.len(), 1);
        assert_eq!(c.country_name(), None);
    }
}
