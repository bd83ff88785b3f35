use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::{alert_failure, confirm_and_delete, send_mutation, DeleteOutcome, EntityForm, FormMode, SubmitError};
use crate::api::{ApiRequest, ApiTransport};
use crate::encoding::{parse_data_url, Part, Payload};
use crate::model::{price_amount, ImageSource, ProductDraft, ProductRecord};
use crate::schema::{FieldErrors, PRODUCT_FORM};
use crate::shell::Dialogs;

pub const ADD_PRODUCT: &str = "/api/add_product";
pub const UPDATE_PRODUCT: &str = "/api/update_product";
pub const DELETE_PRODUCT: &str = "/api/delete_product";

/// Add/edit product modal.
#[derive(Debug, Clone)]
pub struct ProductForm {
    mode: FormMode,
    pub draft: ProductDraft,
    field_errors: FieldErrors,
    error: Option<String>,
}

impl ProductForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            draft: ProductDraft::default(),
            field_errors: FieldErrors::default(),
            error: None,
        }
    }

    pub fn edit(record: &ProductRecord) -> Self {
        Self {
            mode: FormMode::Edit(record.id),
            draft: ProductDraft::from_record(record),
            field_errors: FieldErrors::default(),
            error: None,
        }
    }

    /// Validate, encode and pick the endpoint. No I/O.
    pub fn build_request(&self) -> Result<ApiRequest, SubmitError> {
        let errors = PRODUCT_FORM.validate(&self.draft, self.mode.is_editing());
        if !errors.is_empty() {
            return Err(SubmitError::Validation(errors));
        }

        let payload = encode_product(&self.draft, self.mode.is_editing())?;
        Ok(match self.mode {
            FormMode::Create => ApiRequest::post(ADD_PRODUCT, payload),
            FormMode::Edit(id) => ApiRequest::put(UPDATE_PRODUCT, payload).with_query("id", id),
        })
    }

    fn record_failure(&mut self, err: &SubmitError) {
        match err {
            SubmitError::Validation(errors) => self.field_errors = errors.clone(),
            other => self.error = Some(other.user_message()),
        }
    }
}

/// Multipart body for add and update. Only a freshly picked image is uploaded.
///
/// The update handler reads description, price and count under its own
/// names, so edits carry both spellings.
pub fn encode_product(draft: &ProductDraft, editing: bool) -> Result<Payload, SubmitError> {
    let count = match draft.count.trim() {
        "" => "0",
        count => count,
    };
    let mut parts = vec![
        Part::text("productName", draft.name.trim()),
        Part::text("description", draft.description.trim()),
        Part::text("price", price_amount(&draft.price)),
        Part::text("count", count),
        Part::text("tags", draft.tags.trim()),
    ];
    if editing {
        parts.extend([
            Part::text("product_description", draft.description.trim()),
            Part::text("item_price", price_amount(&draft.price)),
            Part::text("stock_amount", count),
        ]);
    }
    if let ImageSource::DataUrl(url) = &draft.image {
        parts.push(Part::file("image", parse_data_url(url)?));
    }
    Ok(Payload::Multipart(parts))
}

#[async_trait]
impl EntityForm for ProductForm {
    fn mode(&self) -> FormMode {
        self.mode
    }

    fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add Product",
            FormMode::Edit(_) => "Edit Product",
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
                info!(name = %self.draft.name, "product saved");
                Ok(())
            }
            Err(err) => {
                self.record_failure(&err);
                alert_failure(dialogs, "saving product", &err);
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
        let request = ApiRequest::delete(DELETE_PRODUCT).with_query("id", id);
        let prompt = "Are you sure you want to delete this product?";
        confirm_and_delete(api, dialogs, prompt, request, cancel)
            .await
            .map_err(|err| {
                self.record_failure(&err);
                alert_failure(dialogs, "deleting product", &err);
                err
            })
    }
}
