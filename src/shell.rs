//! Routes plus the navigation and dialog seams the views talk to.
use std::fmt;
use std::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Products,
    Storefronts,
    Orders,
    Settings,
    Login,
    Register,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Products => "/products",
            Route::Storefronts => "/storefronts",
            Route::Orders => "/orders",
            Route::Settings => "/settings",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        let route = match path {
            "" => Route::Home,
            "/products" => Route::Products,
            "/storefronts" => Route::Storefronts,
            "/orders" => Route::Orders,
            "/settings" => Route::Settings,
            "/login" => Route::Login,
            "/register" => Route::Register,
            _ => return None,
        };
        Some(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Changes the current route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Blocking prompts shown to the user.
pub trait Dialogs: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// Navigator for the command line: remembers where the last action led.
#[derive(Debug, Default)]
pub struct CliNavigator {
    current: Mutex<Option<Route>>,
}

impl CliNavigator {
    pub fn current(&self) -> Option<Route> {
        self.current.lock().ok().and_then(|guard| *guard)
    }
}

impl Navigator for CliNavigator {
    fn navigate(&self, route: Route) {
        info!(%route, "navigating");
        match self.current.lock() {
            Ok(mut guard) => *guard = Some(route),
            Err(err) => warn!(?err, "navigator state poisoned"),
        }
    }
}

/// Terminal prompts via dialoguer; alerts go to stderr.
#[derive(Debug, Default)]
pub struct TerminalDialogs {
    /// Answer every confirmation with yes, for scripted use.
    pub assume_yes: bool,
}

impl Dialogs for TerminalDialogs {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match dialoguer::Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(err) => {
                warn!(?err, "confirmation prompt failed; treating as cancelled");
                false
            }
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}
