//! Entity forms: validate a draft, encode it, and submit it to the backend.
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::{ApiError, ApiRequest, ApiTransport};
use crate::encoding::EncodingError;
use crate::schema::FieldErrors;
use crate::shell::Dialogs;

pub mod login;
pub mod product;
pub mod registration;
pub mod storefront;

pub use login::LoginForm;
pub use product::ProductForm;
pub use registration::RegistrationForm;
pub use storefront::StorefrontForm;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(FieldErrors),
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error(transparent)]
    Transport(#[from] ApiError),
    #[error("could not encode form: {0}")]
    Encoding(#[from] EncodingError),
}

impl SubmitError {
    /// Text shown to the user; server messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Rejected { status, message } if message.trim().is_empty() => {
                format!("Request failed with status {}", status.as_u16())
            }
            other => other.to_string(),
        }
    }
}

/// Create a new record, or edit the one with this backend id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(u64),
}

impl FormMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Kept,
}

/// Contract shared by the product and storefront modals.
#[async_trait]
pub trait EntityForm: Send {
    fn mode(&self) -> FormMode;

    fn title(&self) -> &'static str;

    fn field_errors(&self) -> &FieldErrors;

    /// Form-level error from the last failed submission.
    fn error(&self) -> Option<&str>;

    async fn submit(
        &mut self,
        api: &dyn ApiTransport,
        dialogs: &dyn Dialogs,
        cancel: &CancellationToken,
    ) -> Result<(), SubmitError>;

    async fn delete(
        &mut self,
        api: &dyn ApiTransport,
        dialogs: &dyn Dialogs,
        cancel: &CancellationToken,
    ) -> Result<DeleteOutcome, SubmitError>;
}

/// Send a mutating request; a redirect or 2xx is success, anything else
/// carries the response body back as the error message.
pub(crate) async fn send_mutation(
    api: &dyn ApiTransport,
    request: ApiRequest,
    cancel: &CancellationToken,
) -> Result<(), SubmitError> {
    let method = request.method.clone();
    let target = request.target();
    let response = api.send(request, cancel).await?;
    if response.is_accepted() {
        info!(%method, %target, status = %response.status, "request accepted");
        return Ok(());
    }
    let message = response.text();
    warn!(%method, %target, status = %response.status, %message, "request rejected");
    Err(SubmitError::Rejected {
        status: response.status,
        message,
    })
}

/// Ask for confirmation, then issue the delete.
pub(crate) async fn confirm_and_delete(
    api: &dyn ApiTransport,
    dialogs: &dyn Dialogs,
    prompt: &str,
    request: ApiRequest,
    cancel: &CancellationToken,
) -> Result<DeleteOutcome, SubmitError> {
    if !dialogs.confirm(prompt) {
        info!(target = %request.target(), "delete cancelled by user");
        return Ok(DeleteOutcome::Kept);
    }
    send_mutation(api, request, cancel).await?;
    Ok(DeleteOutcome::Deleted)
}

/// Report a failed network step through the alert dialog.
pub(crate) fn alert_failure(dialogs: &dyn Dialogs, action: &str, err: &SubmitError) {
    match err {
        SubmitError::Validation(_) => {}
        SubmitError::Transport(ApiError::Cancelled) => {
            info!(action, "request cancelled");
            dialogs.alert(&format!("Error {action}: {}", err.user_message()));
        }
        SubmitError::Transport(source) => {
            warn!(?source, action, "request did not complete");
            dialogs.alert(&format!("Error {action}: could not reach the server"));
        }
        _ => dialogs.alert(&format!("Error {action}: {}", err.user_message())),
    }
}
