//! Side navigation: fixed section links and logout.
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::api::{ApiRequest, ApiTransport};
use crate::encoding::Payload;
use crate::shell::{Navigator, Route};

pub const LOGOUT: &str = "/api/logout";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

pub const NAV_LINKS: [NavLink; 5] = [
    NavLink { label: "FrontRunner", route: Route::Home },
    NavLink { label: "My Products", route: Route::Products },
    NavLink { label: "My Storefronts", route: Route::Storefronts },
    NavLink { label: "My Orders", route: Route::Orders },
    NavLink { label: "Settings", route: Route::Settings },
];

pub fn follow(navigator: &dyn Navigator, link: &NavLink) {
    navigator.navigate(link.route);
}

/// End the session. The user lands on the login page whatever the server says.
#[instrument(skip_all)]
pub async fn logout(api: &dyn ApiTransport, navigator: &dyn Navigator, cancel: &CancellationToken) {
    match api.send(ApiRequest::post(LOGOUT, Payload::Empty), cancel).await {
        Ok(response) if response.is_accepted() => info!("logged out"),
        Ok(response) => warn!(status = %response.status, body = %response.text(), "logout rejected"),
        Err(err) => warn!(?err, "logout request failed"),
    }
    navigator.navigate(Route::Login);
}
