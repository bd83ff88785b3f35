use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::{alert_failure, send_mutation, SubmitError};
use crate::api::{ApiRequest, ApiTransport};
use crate::encoding::Payload;
use crate::schema::{FieldErrors, FormState, LOGIN_FORM};
use crate::shell::{Dialogs, Navigator, Route};

pub const LOGIN: &str = "/api/login";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl FormState for Credentials {
    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "email" => Some(&self.email),
            "password" => Some(&self.password),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub credentials: Credentials,
    field_errors: FieldErrors,
    error: Option<String>,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Credentials {
                email: email.into(),
                password: password.into(),
            },
            ..Default::default()
        }
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn build_request(&self) -> Result<ApiRequest, SubmitError> {
        let errors = LOGIN_FORM.validate(&self.credentials, false);
        if !errors.is_empty() {
            return Err(SubmitError::Validation(errors));
        }
        Ok(ApiRequest::post(
            LOGIN,
            Payload::UrlEncoded(vec![
                ("email".into(), self.credentials.email.trim().to_string()),
                ("password".into(), self.credentials.password.clone()),
            ]),
        ))
    }

    /// Log in; the server answers with a redirect on success and the app
    /// moves to the home route. Server and transport failures are alerted.
    #[instrument(skip_all)]
    pub async fn submit(
        &mut self,
        api: &dyn ApiTransport,
        navigator: &dyn Navigator,
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
                info!("logged in");
                navigator.navigate(Route::Home);
                Ok(())
            }
            Err(SubmitError::Validation(errors)) => {
                self.field_errors = errors.clone();
                Err(SubmitError::Validation(errors))
            }
            Err(err) => {
                self.error = Some(err.user_message());
                alert_failure(dialogs, "logging in", &err);
                Err(err)
            }
        }
    }
}
