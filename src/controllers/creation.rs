//! Creation controller: owns one draft, validates it and submits it.

use std::collections::{BTreeMap, BTreeSet};

use crate::api::{ApiResult, ClientApi};
use crate::controllers::{Observers, SubscriptionId};
use crate::domain::client::{Client, NewClient};
use crate::forms::FormError;
use crate::forms::client::ClientForm;
use crate::forms::validation::{ClientField, FieldRule, PhonePolicy, ValidationReport};
use crate::notice::Notice;
use crate::services::clients as client_service;

/// Action taken once the flow ends, e.g. navigating away or closing a dialog
/// with the created record.
pub trait Completion: Send {
    fn on_success(&mut self, client: &Client);
    fn on_cancel(&mut self);
}

/// Classified outcome of a rejected submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreationFailure {
    DuplicateKey,
    /// Field-scoped rejections keyed by wire field name.
    FieldErrors(BTreeMap<String, String>),
    Unknown(String),
}

impl CreationFailure {
    pub fn message(&self) -> String {
        match self {
            CreationFailure::DuplicateKey => "A client with this shared key already exists".into(),
            CreationFailure::FieldErrors(fields) => {
                let fields: Vec<&str> = fields.keys().map(String::as_str).collect();
                format!("The service rejected: {}", fields.join(", "))
            }
            CreationFailure::Unknown(message) => format!("Error creating client: {message}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CreationState {
    Editing,
    Submitting,
    Succeeded(Client),
    Failed(CreationFailure),
}

pub struct CreationController<C: Completion> {
    draft: ClientForm,
    policy: PhonePolicy,
    completion: C,
    state: CreationState,
    touched: BTreeSet<ClientField>,
    server_errors: BTreeMap<String, String>,
    last_failure: Option<CreationFailure>,
    notices: Vec<Notice>,
    observers: Observers<CreationState>,
}

impl<C: Completion> CreationController<C> {
    pub fn new(policy: PhonePolicy, completion: C) -> Self {
        Self {
            draft: ClientForm::default(),
            policy,
            completion,
            state: CreationState::Editing,
            touched: BTreeSet::new(),
            server_errors: BTreeMap::new(),
            last_failure: None,
            notices: Vec::new(),
            observers: Observers::default(),
        }
    }

    /// Starts from a prefilled draft. Prefilled fields are not marked touched.
    pub fn with_draft(mut self, draft: ClientForm) -> Self {
        self.draft = draft;
        self
    }

    pub fn state(&self) -> &CreationState {
        &self.state
    }

    pub fn draft(&self) -> &ClientForm {
        &self.draft
    }

    pub fn policy(&self) -> &PhonePolicy {
        &self.policy
    }

    pub fn completion(&self) -> &C {
        &self.completion
    }

    /// Failure of the most recent submission, kept after returning to editing.
    pub fn last_failure(&self) -> Option<&CreationFailure> {
        self.last_failure.as_ref()
    }

    pub fn is_touched(&self, field: ClientField) -> bool {
        self.touched.contains(&field)
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&CreationState) + Send + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn transition(&mut self, next: CreationState) {
        self.state = next;
        self.observers.notify(&self.state);
    }

    /// Updates one field of the draft.
    ///
    /// Returns `false` without changing anything unless the controller is
    /// editing.
    pub fn set_field(&mut self, field: ClientField, value: impl Into<String>) -> bool {
        if self.state != CreationState::Editing {
            log::debug!("Ignoring edit of {field} while not editing");
            return false;
        }
        self.draft.set(field, value);
        self.touched.insert(field);
        self.server_errors.remove(field.as_str());
        true
    }

    /// Full validation of the current draft, touched or not.
    pub fn report(&self) -> ValidationReport {
        self.draft.validate(&self.policy)
    }

    /// Local rule failures of the fields the user has touched.
    pub fn visible_errors(&self) -> BTreeMap<ClientField, FieldRule> {
        self.report()
            .field_errors()
            .iter()
            .filter(|(field, _)| self.touched.contains(field))
            .map(|(field, rule)| (*field, *rule))
            .collect()
    }

    /// Date ordering error, shown once either date has been touched.
    pub fn date_order_visible(&self) -> bool {
        (self.is_touched(ClientField::StartDate) || self.is_touched(ClientField::EndDate))
            && self.report().date_order_invalid()
    }

    /// Message the service attached to `field` on the last rejection.
    pub fn server_error(&self, field: ClientField) -> Option<&str> {
        self.server_errors.get(field.as_str()).map(String::as_str)
    }

    /// Validates exhaustively and, if the draft is valid, enters `Submitting`.
    ///
    /// Every field is marked touched first so that untouched required fields
    /// surface together. Returns the payload to send, or `None` when the
    /// draft is invalid or a submission is already running.
    pub fn begin_submit(&mut self) -> Option<NewClient> {
        if self.state != CreationState::Editing {
            log::warn!("Submit ignored in state {:?}", self.state);
            return None;
        }

        self.touched.extend(ClientField::ALL);
        match self.draft.to_new_client(&self.policy) {
            Ok(new_client) => {
                self.server_errors.clear();
                self.transition(CreationState::Submitting);
                Some(new_client)
            }
            Err(FormError::Validation(report)) => {
                log::debug!("Draft rejected locally: {report}");
                self.observers.notify(&self.state);
                None
            }
            Err(err) => {
                log::error!("Valid draft failed to convert: {err}");
                self.observers.notify(&self.state);
                None
            }
        }
    }

    /// Applies the service response to a submission started by
    /// [`Self::begin_submit`].
    ///
    /// Failures are published as `Failed` and the controller then returns to
    /// `Editing` so the draft can be corrected.
    pub fn complete_submit(&mut self, result: ApiResult<Client>) {
        if self.state != CreationState::Submitting {
            log::warn!("Discarding submit result outside of a submission");
            return;
        }

        match result {
            Ok(client) => {
                self.last_failure = None;
                self.notices.push(Notice::success(format!(
                    "Client {} created",
                    client.shared_key
                )));
                self.completion.on_success(&client);
                self.transition(CreationState::Succeeded(client));
            }
            Err(err) => {
                let failure = CreationFailure::from(err);
                if let CreationFailure::FieldErrors(fields) = &failure {
                    self.server_errors = fields.clone();
                }
                self.notices.push(Notice::error(failure.message()));
                self.last_failure = Some(failure.clone());
                self.transition(CreationState::Failed(failure));
                self.transition(CreationState::Editing);
            }
        }
    }

    /// Validates, submits and applies the outcome. Returns the final state.
    pub async fn submit<A>(&mut self, api: &A) -> &CreationState
    where
        A: ClientApi + ?Sized,
    {
        if let Some(new_client) = self.begin_submit() {
            let result = client_service::create_client(api, &new_client).await;
            self.complete_submit(result);
        }
        &self.state
    }

    /// Abandons the flow without submitting.
    ///
    /// Returns `false` while a submission is in flight.
    pub fn cancel(&mut self) -> bool {
        if self.state == CreationState::Submitting {
            log::debug!("Cancel ignored while submitting");
            return false;
        }
        self.completion.on_cancel();
        true
    }

    /// Clears the draft and returns to editing, e.g. to create another record.
    pub fn reset(&mut self) {
        self.draft = ClientForm::default();
        self.touched.clear();
        self.server_errors.clear();
        self.last_failure = None;
        self.transition(CreationState::Editing);
    }
}
