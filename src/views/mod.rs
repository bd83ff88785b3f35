//! List views: fetch a collection, expose it as tiles, and host the entity
//! form modal for it.
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, ApiRequest, ApiTransport};
use crate::forms::{DeleteOutcome, EntityForm, SubmitError};
use crate::shell::Dialogs;

pub mod home;
pub mod orders;
pub mod products;
pub mod storefronts;

pub use home::Home;
pub use orders::OrdersView;
pub use products::ProductsView;
pub use storefronts::StorefrontsView;

/// GET a collection. 401 means "nothing to show yet"; every other failure is
/// logged and also yields an empty list.
#[instrument(skip(api, cancel))]
pub async fn fetch_collection<T: DeserializeOwned>(
    api: &dyn ApiTransport,
    path: &str,
    cancel: &CancellationToken,
) -> Vec<T> {
    let response = match api.send(ApiRequest::get(path), cancel).await {
        Ok(response) => response,
        Err(ApiError::Cancelled) => {
            debug!("fetch cancelled");
            return Vec::new();
        }
        Err(err) => {
            warn!(?err, "failed to fetch collection");
            return Vec::new();
        }
    };

    if response.status == StatusCode::UNAUTHORIZED {
        info!("not authenticated; showing empty state");
        return Vec::new();
    }
    if !response.status.is_success() {
        warn!(status = %response.status, body = %response.text(), "collection request failed");
        return Vec::new();
    }
    match response.json::<Option<Vec<T>>>() {
        Ok(items) => items.unwrap_or_default(),
        Err(err) => {
            warn!(?err, "collection response was not valid JSON");
            Vec::new()
        }
    }
}

/// Call to action shown when a collection is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    pub message: &'static str,
    pub action: &'static str,
}

/// A fetchable collection and the form used to add or edit its records.
pub trait Collection {
    type Record: DeserializeOwned + Clone;
    type Form: EntityForm;

    const ENDPOINT: &'static str;
    const EMPTY: EmptyState;

    fn id(record: &Self::Record) -> u64;
    fn create_form() -> Self::Form;
    fn edit_form(record: &Self::Record) -> Self::Form;
}

/// Items plus at most one open modal.
pub struct ListView<C: Collection> {
    items: Vec<C::Record>,
    modal: Option<C::Form>,
}

impl<C: Collection> ListView<C> {
    /// Fetch the collection for the first render.
    pub async fn mount(api: &dyn ApiTransport, cancel: &CancellationToken) -> Self {
        let mut view = Self {
            items: Vec::new(),
            modal: None,
        };
        view.refresh(api, cancel).await;
        view
    }

    pub async fn refresh(&mut self, api: &dyn ApiTransport, cancel: &CancellationToken) {
        self.items = fetch_collection(api, C::ENDPOINT, cancel).await;
    }

    pub fn items(&self) -> &[C::Record] {
        &self.items
    }

    pub fn find(&self, id: u64) -> Option<&C::Record> {
        self.items.iter().find(|r| C::id(r) == id)
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        self.items.is_empty().then_some(C::EMPTY)
    }

    pub fn modal(&self) -> Option<&C::Form> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut C::Form> {
        self.modal.as_mut()
    }

    pub fn open_add(&mut self) -> &mut C::Form {
        self.modal.insert(C::create_form())
    }

    /// Open the edit form for the record with `id`, if it is listed.
    pub fn open_edit(&mut self, id: u64) -> Option<&mut C::Form> {
        let form = C::edit_form(self.find(id)?);
        Some(self.modal.insert(form))
    }

    /// Close the modal and refetch so edits show up.
    pub async fn close_modal(&mut self, api: &dyn ApiTransport, cancel: &CancellationToken) {
        if self.modal.take().is_some() {
            self.refresh(api, cancel).await;
        }
    }

    /// Submit the open form; on success the modal closes and the list reloads.
    /// On failure the modal stays open with its errors.
    pub async fn submit_modal(
        &mut self,
        api: &dyn ApiTransport,
        dialogs: &dyn Dialogs,
        cancel: &CancellationToken,
    ) -> Result<(), SubmitError> {
        let Some(form) = self.modal.as_mut() else {
            return Ok(());
        };
        form.submit(api, dialogs, cancel).await?;
        self.close_modal(api, cancel).await;
        Ok(())
    }

    /// Delete the record behind the open form after confirmation. A declined
    /// confirmation leaves the modal open.
    pub async fn delete_in_modal(
        &mut self,
        api: &dyn ApiTransport,
        dialogs: &dyn Dialogs,
        cancel: &CancellationToken,
    ) -> Result<DeleteOutcome, SubmitError> {
        let Some(form) = self.modal.as_mut() else {
            return Ok(DeleteOutcome::Kept);
        };
        let outcome = form.delete(api, dialogs, cancel).await?;
        if outcome == DeleteOutcome::Deleted {
            self.close_modal(api, cancel).await;
        }
        Ok(outcome)
    }
}
