//! The edit session and the dispatcher that drives requests against it.
//!
//! An [`EditSession`] is owned by exactly one task. [`Dispatcher::dispatch`]
//! spawns one request task per action and hands the result back as a
//! [`Completion`] over a channel; the owner applies completions one at a time
//! with [`EditSession::apply`]. Requests are never cancelled or coalesced, so
//! overlapping actions race and whichever completion is applied last wins the
//! form.

use std::{fmt, str::FromStr, sync::Arc};

use shared::{
    domain::{Promotion, PromotionId},
    protocol::{HealthStatus, PromotionPayload, SearchQuery},
};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    error::{ServiceError, GENERIC_FAILURE_MESSAGE},
    form::PromotionForm,
    render::{render_search_results, ResultsTable},
    service::PromotionService,
};

pub const SUCCESS_MESSAGE: &str = "Success";
pub const DELETED_MESSAGE: &str = "Promotion has been Deleted!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Update,
    Retrieve,
    Delete,
    Clear,
    Search,
    Activate,
    Deactivate,
    Health,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Create,
        Action::Update,
        Action::Retrieve,
        Action::Delete,
        Action::Clear,
        Action::Search,
        Action::Activate,
        Action::Deactivate,
        Action::Health,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Retrieve => "retrieve",
            Action::Delete => "delete",
            Action::Clear => "clear",
            Action::Search => "search",
            Action::Activate => "activate",
            Action::Deactivate => "deactivate",
            Action::Health => "health",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Action::ALL
            .into_iter()
            .find(|action| action.name() == wanted)
            .ok_or_else(|| UnknownAction(raw.to_string()))
    }
}

/// A request snapshot taken from the form at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionRequest {
    Create(PromotionPayload),
    Update {
        id: PromotionId,
        payload: PromotionPayload,
    },
    Retrieve(PromotionId),
    Delete(PromotionId),
    Search(SearchQuery),
    SetActive {
        id: PromotionId,
        active: bool,
    },
    Health,
}

impl PromotionRequest {
    /// Returns `None` for actions that never leave the client.
    pub fn from_form(action: Action, form: &PromotionForm) -> Option<Self> {
        let request = match action {
            Action::Create => Self::Create(form.read()),
            Action::Update => Self::Update {
                id: form.lookup_id(),
                payload: form.read(),
            },
            Action::Retrieve => Self::Retrieve(form.lookup_id()),
            Action::Delete => Self::Delete(form.lookup_id()),
            Action::Search => Self::Search(form.search_query()),
            Action::Activate => Self::SetActive {
                id: form.lookup_id(),
                active: true,
            },
            Action::Deactivate => Self::SetActive {
                id: form.lookup_id(),
                active: false,
            },
            Action::Health => Self::Health,
            Action::Clear => return None,
        };
        Some(request)
    }

    pub async fn send(self, service: &dyn PromotionService) -> Result<Response, ServiceError> {
        match self {
            Self::Create(payload) => service.create(&payload).await.map(Response::Promotion),
            Self::Update { id, payload } => service
                .update(&id, &payload)
                .await
                .map(Response::Promotion),
            Self::Retrieve(id) => service.retrieve(&id).await.map(Response::Promotion),
            Self::Delete(id) => service.delete(&id).await.map(|()| Response::Deleted),
            Self::Search(query) => service.search(query).await.map(Response::Listing),
            Self::SetActive { id, active } => service
                .set_active(&id, active)
                .await
                .map(Response::Promotion),
            Self::Health => service.health().await.map(Response::Health),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Promotion(Promotion),
    Deleted,
    Listing(Vec<Promotion>),
    Health(HealthStatus),
}

#[derive(Debug)]
pub struct Completion {
    /// Dispatch order; completions may arrive in a different order.
    pub sequence: u64,
    pub action: Action,
    pub outcome: Result<Response, ServiceError>,
}

/// The single promotion being edited, the flash message area and the last
/// rendered search listing.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    pub form: PromotionForm,
    pub flash: String,
    pub results: Option<ResultsTable>,
    pub last_applied: Option<u64>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole flash area.
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flash = message.into();
    }

    pub fn clear_flash(&mut self) {
        self.flash.clear();
    }

    /// The local clear action: id, flash and every editable field.
    pub fn clear(&mut self) {
        self.form.id.clear();
        self.clear_flash();
        self.form.clear();
    }

    pub fn results_html(&self) -> Option<String> {
        self.results.as_ref().map(ResultsTable::to_html)
    }

    /// Runs exactly one success or failure handler for a finished request.
    pub fn apply(&mut self, completion: Completion) {
        let Completion {
            sequence,
            action,
            outcome,
        } = completion;
        debug!(sequence, %action, ok = outcome.is_ok(), "applying completion");
        self.last_applied = Some(sequence);

        match outcome {
            Ok(Response::Promotion(record)) => {
                self.form.write(&record);
                self.flash(SUCCESS_MESSAGE);
            }
            Ok(Response::Deleted) => {
                self.form.clear();
                self.flash(DELETED_MESSAGE);
            }
            Ok(Response::Listing(records)) => {
                self.results = Some(render_search_results(&records, &mut self.form));
                self.flash(SUCCESS_MESSAGE);
            }
            Ok(Response::Health(health)) => {
                self.flash(health.message);
            }
            Err(err) => {
                warn!(sequence, %action, error = %err, "promotion request failed");
                match action {
                    Action::Delete | Action::Health => self.flash(GENERIC_FAILURE_MESSAGE),
                    Action::Retrieve => {
                        self.form.clear();
                        self.flash(err.flash_text());
                    }
                    _ => self.flash(err.flash_text()),
                }
            }
        }
    }
}

pub struct Dispatcher {
    service: Arc<dyn PromotionService>,
    completions: mpsc::UnboundedSender<Completion>,
    next_sequence: u64,
}

impl Dispatcher {
    pub fn new(service: Arc<dyn PromotionService>) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (completions, rx) = mpsc::unbounded_channel();
        (
            Self {
                service,
                completions,
                next_sequence: 0,
            },
            rx,
        )
    }

    /// Starts `action` against the session.
    ///
    /// The flash area is emptied immediately. Local actions are applied in
    /// place and return `None`; remote ones return the handle of the spawned
    /// request, whose completion arrives on the receiver returned by
    /// [`Dispatcher::new`].
    pub fn dispatch(&mut self, session: &mut EditSession, action: Action) -> Option<JoinHandle<()>> {
        session.clear_flash();

        let Some(request) = PromotionRequest::from_form(action, &session.form) else {
            session.clear();
            return None;
        };

        self.next_sequence += 1;
        let sequence = self.next_sequence;
        let service = Arc::clone(&self.service);
        let completions = self.completions.clone();
        debug!(sequence, %action, "dispatching promotion request");

        Some(tokio::spawn(async move {
            let outcome = request.send(service.as_ref()).await;
            let completion = Completion {
                sequence,
                action,
                outcome,
            };
            if completions.send(completion).is_err() {
                warn!(sequence, %action, "edit session closed before completion was delivered");
            }
        }))
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
