use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use super::login::LoginForm;
use super::{alert_failure, send_mutation, SubmitError};
use crate::api::{ApiRequest, ApiTransport};
use crate::encoding::Payload;
use crate::schema::{FieldErrors, FormState, REGISTRATION_FORM};
use crate::shell::{Dialogs, Navigator, Route};

pub const REGISTER: &str = "/api/register";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub business_name: String,
}

impl FormState for Registration {
    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "email" => Some(&self.email),
            "password" => Some(&self.password),
            "businessName" => Some(&self.business_name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub registration: Registration,
    field_errors: FieldErrors,
    error: Option<String>,
}

impl RegistrationForm {
    pub fn new(registration: Registration) -> Self {
        Self {
            registration,
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
        let errors = REGISTRATION_FORM.validate(&self.registration, false);
        if !errors.is_empty() {
            return Err(SubmitError::Validation(errors));
        }
        let r = &self.registration;
        Ok(ApiRequest::post(
            REGISTER,
            Payload::UrlEncoded(vec![
                ("email".into(), r.email.trim().to_string()),
                ("password".into(), r.password.clone()),
                ("businessName".into(), r.business_name.trim().to_string()),
            ]),
        ))
    }

    /// Create the account, then log straight in with the same credentials.
    ///
    /// If the account is created but the follow-up login fails, the user is
    /// sent to the login page and the login error is returned.
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

        let registered = match self.build_request() {
            Ok(request) => send_mutation(api, request, cancel).await,
            Err(err) => Err(err),
        };
        if let Err(err) = registered {
            match &err {
                SubmitError::Validation(errors) => self.field_errors = errors.clone(),
                other => {
                    self.error = Some(other.user_message());
                    alert_failure(dialogs, "registering", other);
                }
            }
            return Err(err);
        }
        info!("account registered");

        let mut login = LoginForm::new(
            self.registration.email.clone(),
            self.registration.password.clone(),
        );
        if let Err(err) = login.submit(api, navigator, dialogs, cancel).await {
            warn!(?err, "automatic login after registration failed");
            self.error = Some(err.user_message());
            navigator.navigate(Route::Login);
            return Err(err);
        }
        Ok(())
    }
}
