#![allow(dead_code)]

use async_trait::async_trait;
use frontrunner::api::{ApiError, ApiRequest, ApiResponse, ApiTransport};
use frontrunner::shell::{Dialogs, Navigator, Route};
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Transport double: answers from a script and records every request.
#[derive(Clone, Default)]
pub struct RecordingApi {
    responses: Arc<Mutex<VecDeque<Result<ApiResponse, ApiError>>>>,
    fixed: Arc<Vec<(String, String)>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl RecordingApi {
    pub fn with_responses(responses: Vec<Result<ApiResponse, ApiError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Default::default()
        }
    }

    /// Always answer GETs of these paths with 200 and the given body.
    pub fn fixed(mut self, fixed: &[(&str, &str)]) -> Self {
        self.fixed = Arc::new(
            fixed
                .iter()
                .map(|(path, body)| (path.to_string(), body.to_string()))
                .collect(),
        );
        self
    }

    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ApiTransport for RecordingApi {
    async fn send(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        let fixed = self
            .fixed
            .iter()
            .find(|(path, _)| request.method == reqwest::Method::GET && *path == request.path)
            .map(|(_, body)| ApiResponse::new(StatusCode::OK, body.clone()));
        self.requests.lock().await.push(request);
        if let Some(response) = fixed {
            return Ok(response);
        }
        let mut guard = self.responses.lock().await;
        guard
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::new(StatusCode::OK, "[]")))
    }
}

pub fn ok(body: &str) -> Result<ApiResponse, ApiError> {
    Ok(ApiResponse::new(StatusCode::OK, body.to_string()))
}

pub fn status(code: u16, body: &str) -> Result<ApiResponse, ApiError> {
    let status = StatusCode::from_u16(code).unwrap();
    Ok(ApiResponse::new(status, body.to_string()))
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: StdMutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

/// Confirms answer from a script (default yes); prompts and alerts are kept.
#[derive(Default)]
pub struct ScriptedDialogs {
    answers: StdMutex<VecDeque<bool>>,
    prompts: StdMutex<Vec<String>>,
    alerts: StdMutex<Vec<String>>,
}

impl ScriptedDialogs {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: StdMutex::new(answers.iter().copied().collect()),
            ..Default::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Dialogs for ScriptedDialogs {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or(true)
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

pub const PRODUCTS_JSON: &str = r##"[
    {"prodID": 1, "prodName": "Lamp", "prodDesc": "Bright", "image": "uploads/lamp.png", "prodPrice": 19.99, "prodCount": 3, "prodTags": "#home"},
    {"prodID": 2, "prodName": "Mug", "prodDesc": "Ceramic", "image": "", "prodPrice": 8.5, "prodCount": 12, "prodTags": ""},
    {"prodID": 3, "prodName": "Rug", "prodDesc": "Wool", "image": "", "prodPrice": 120, "prodCount": 1, "prodTags": "#home, #sale"},
    {"prodID": 4, "prodName": "Vase", "prodDesc": "Glass", "image": "", "prodPrice": 30, "prodCount": 0, "prodTags": ""}
]"##;

pub const STOREFRONTS_JSON: &str = r##"[
    {"id": 7, "storeType": "etsy", "storeName": "Main Shop", "storeId": "etsy-7", "storeUrl": "https://etsy.com/shop/main"},
    {"id": 8, "storeType": "amazon", "storeName": "", "storeId": "", "storeUrl": ""}
]"##;
