//! Create-cluster form: draft values, required-field validation and a
//! single-flight submit.

use std::collections::BTreeMap;

use clusterdesk_proto::prelude::*;

use crate::cascade::LocationCascade;
use crate::error::{CascadeError, FormError, FormField, GatewayError};
use crate::gateway::ClusterGateway;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const GENERIC_FAILURE: &str = "Failed to create cluster. Please try again.";

/// Result of a finished submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The form was reset; the caller should navigate to the list view.
    Created(Cluster),
    /// The server rejected specific fields; see [`ClusterForm::errors`].
    FieldErrors,
    /// Any other failure; see [`ClusterForm::notice`].
    Failed(GatewayError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterForm {
    name: String,
    email: String,
    location: String,
    latitude: String,
    longitude: String,
    cascade: LocationCascade,
    errors: BTreeMap<String, String>,
    notice: Option<String>,
    submitting: bool,
}

impl Default for ClusterForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            location: String::new(),
            latitude: DEFAULT_COORDINATE.to_string(),
            longitude: DEFAULT_COORDINATE.to_string(),
            cascade: LocationCascade::new(),
            errors: BTreeMap::new(),
            notice: None,
            submitting: false,
        }
    }
}

impl ClusterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn cascade(&self) -> &LocationCascade {
        &self.cascade
    }

    /// Direct access for loading option lists.
    pub fn cascade_mut(&mut self) -> &mut LocationCascade {
        &mut self.cascade
    }

    /// Field key to message, both local `Required` errors and server ones.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error_for(&self, field: FormField) -> Option<&str> {
        self.errors.get(field.key()).map(String::as_str)
    }

    /// Generic failure banner text.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
        self.clear_error(FormField::Name);
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
        self.clear_error(FormField::Email);
    }

    pub fn set_location(&mut self, value: impl Into<String>) {
        self.location = value.into();
        self.clear_error(FormField::Location);
    }

    pub fn select_country(&mut self, id: LocationId) {
        self.cascade.select_country(id);
        self.clear_error(FormField::Country);
    }

    pub fn select_state(&mut self, id: LocationId) -> Result<(), CascadeError> {
        self.cascade.select_state(id)?;
        self.clear_error(FormField::State);
        Ok(())
    }

    pub fn select_city(&mut self, id: LocationId) -> Result<(), CascadeError> {
        self.cascade.select_city(id)?;
        self.clear_error(FormField::City);
        Ok(())
    }

    fn clear_error(&mut self, field: FormField) {
        self.errors.remove(field.key());
    }

    /// Check required fields and build the request body.
    pub fn validate(&self) -> Result<ClusterDraft, FormError> {
        let missing: Vec<FormField> = FormField::ALL
            .into_iter()
            .filter(|field| match field {
                FormField::Name => self.name.trim().is_empty(),
                FormField::Email => self.email.trim().is_empty(),
                FormField::Location => self.location.trim().is_empty(),
                FormField::Country => !self.cascade.country().is_selected(),
                FormField::State => !self.cascade.state().is_selected(),
                FormField::City => !self.cascade.city().is_selected(),
            })
            .collect();

        match (
            self.cascade.country().id(),
            self.cascade.state().id(),
            self.cascade.city().id(),
        ) {
            (Some(country_id), Some(state_id), Some(city_id)) if missing.is_empty() => {
                Ok(ClusterDraft {
                    name: self.name.trim().to_string(),
                    email: self.email.trim().to_string(),
                    country_id,
                    state_id,
                    city_id,
                    location: self.location.trim().to_string(),
                    latitude: self.latitude.clone(),
                    longitude: self.longitude.clone(),
                })
            }
            _ => Err(FormError::Required(missing)),
        }
    }

    /// Start a submit. Fails locally, without touching the network, when a
    /// submit is already outstanding or a required field is empty.
    pub fn begin_submit(&mut self) -> Result<ClusterDraft, FormError> {
        if self.submitting {
            return Err(FormError::InFlight);
        }
        let draft = match self.validate() {
            Ok(draft) => draft,
            Err(err) => {
                if let FormError::Required(fields) = &err {
                    for field in fields {
                        self.errors
                            .insert(field.key().to_string(), REQUIRED_MESSAGE.to_string());
                    }
                }
                return Err(err);
            }
        };
        self.submitting = true;
        self.notice = None;
        Ok(draft)
    }

    /// Record the outcome of the request started by [`begin_submit`](Self::begin_submit).
    pub fn finish_submit(&mut self, result: Result<Cluster, GatewayError>) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(cluster) => {
                log::info!("created cluster {} ({})", cluster.id, cluster.name);
                self.reset();
                SubmitOutcome::Created(cluster)
            }
            Err(err) => {
                log::warn!("create cluster failed: {err}");
                match err.field_errors() {
                    Some(fields) => {
                        self.errors = fields.clone();
                        SubmitOutcome::FieldErrors
                    }
                    None => {
                        self.notice = Some(
                            err.server_message()
                                .filter(|m| !m.is_empty())
                                .map(str::to_string)
                                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
                        );
                        SubmitOutcome::Failed(err)
                    }
                }
            }
        }
    }

    /// Validate, send and record the outcome in one step.
    pub async fn submit<G: ClusterGateway + ?Sized>(
        &mut self,
        gateway: &G,
    ) -> Result<SubmitOutcome, FormError> {
        let draft = self.begin_submit()?;
        let result = gateway.create_cluster(&draft).await;
        Ok(self.finish_submit(result))
    }

    /// Back to the initial defaults. Loaded country options survive.
    pub fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.location.clear();
        self.latitude = DEFAULT_COORDINATE.to_string();
        self.longitude = DEFAULT_COORDINATE.to_string();
        self.cascade.reset();
        self.errors.clear();
        self.notice = None;
        self.submitting = false;
    }
}
