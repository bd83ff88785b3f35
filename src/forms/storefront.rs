use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::{alert_failure, confirm_and_delete, send_mutation, DeleteOutcome, EntityForm, FormMode, SubmitError};
use crate::api::{ApiRequest, ApiTransport};
use crate::encoding::json_payload;
use crate::model::{StorefrontDraft, StorefrontRecord};
use crate::schema::{FieldErrors, STOREFRONT_FORM};
use crate::shell::Dialogs;

pub const ADD_STOREFRONT: &str = "/api/add_storefront";
pub const UPDATE_STOREFRONT: &str = "/api/update_storefront";
pub const DELETE_STOREFRONT: &str = "/api/delete_storefront";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddStorefrontBody<'a> {
    store_type: &'a str,
    store_name: String,
    api_key: &'a str,
    api_secret: &'a str,
    store_id: &'a str,
    store_url: &'a str,
}

/// Type and credentials are fixed once a link exists.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStorefrontBody<'a> {
    store_name: String,
    store_id: &'a str,
    store_url: &'a str,
}

/// Link/edit storefront modal.
#[derive(Debug, Clone)]
pub struct StorefrontForm {
    mode: FormMode,
    pub draft: StorefrontDraft,
    field_errors: FieldErrors,
    error: Option<String>,
}

impl StorefrontForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            draft: StorefrontDraft::default(),
            field_errors: FieldErrors::default(),
            error: None,
        }
    }

    pub fn edit(record: &StorefrontRecord) -> Self {
        Self {
            mode: FormMode::Edit(record.id),
            draft: StorefrontDraft::from_record(record),
            field_errors: FieldErrors::default(),
            error: None,
        }
    }

    pub fn build_request(&self) -> Result<ApiRequest, SubmitError> {
        let errors = STOREFRONT_FORM.validate(&self.draft, self.mode.is_editing());
        if !errors.is_empty() {
            return Err(SubmitError::Validation(errors));
        }

        let draft = &self.draft;
        let request = match self.mode {
            FormMode::Create => {
                let body = AddStorefrontBody {
                    store_type: draft.store_type.as_str(),
                    store_name: draft.effective_name(),
                    api_key: draft.api_key.trim(),
                    api_secret: draft.api_secret.trim(),
                    store_id: draft.store_id.trim(),
                    store_url: draft.store_url.trim(),
                };
                ApiRequest::post(ADD_STOREFRONT, json_payload(&body)?)
            }
            FormMode::Edit(id) => {
                let body = UpdateStorefrontBody {
                    store_name: draft.effective_name(),
                    store_id: draft.store_id.trim(),
                    store_url: draft.store_url.trim(),
                };
                ApiRequest::put(UPDATE_STOREFRONT, json_payload(&body)?).with_query("id", id)
            }
        };
        Ok(request)
    }

    fn record_failure(&mut self, err: &SubmitError) {
        match err {
            SubmitError::Validation(errors) => {
                self.error = Some(errors.to_string());
                self.field_errors = errors.clone();
            }
            other => self.error = Some(other.user_message()),
        }
    }
}

#[async_trait]
impl EntityForm for StorefrontForm {
    fn mode(&self) -> FormMode {
        self.mode
    }

    fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Link New Storefront",
            FormMode::Edit(_) => "Edit Storefront Link",
        }
    }

    fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[instrument(skip_all)]
    async fn submit(
        &mut self,
        api: &dyn ApiTransport,
        dialogs: &dyn Dialogs,
        cancel: &CancellationToken,
    ) -> Result<(), SubmitError> {
        self.field_errors = FieldErrors::default();
        self.error = None;

        let result = match self.build_request() {
            Ok(request) => send_mutation(api, request, cancel).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => {
                info!(store_type = %self.draft.store_type, "storefront link saved");
                Ok(())
            }
            Err(err) => {
                self.record_failure(&err);
                alert_failure(dialogs, "saving storefront", &err);
                Err(err)
            }
        }
    }

    #[instrument(skip_all)]
    async fn delete(
        &mut self,
        api: &dyn ApiTransport,
        dialogs: &dyn Dialogs,
        cancel: &CancellationToken,
    ) -> Result<DeleteOutcome, SubmitError> {
        let FormMode::Edit(id) = self.mode else {
            return Ok(DeleteOutcome::Kept);
        };
        let request = ApiRequest::delete(DELETE_STOREFRONT).with_query("id", id);
        let prompt = format!(
            "Are you sure you want to unlink \"{}\"?",
            self.draft.effective_name()
        );
        confirm_and_delete(api, dialogs, &prompt, request, cancel)
            .await
            .map_err(|err| {
                self.record_failure(&err);
                alert_failure(dialogs, "deleting storefront", &err);
                err
            })
    }
}
