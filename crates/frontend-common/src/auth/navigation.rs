//! Redirects triggered by the session lifecycle

use std::sync::{Arc, Mutex, PoisonError};

/// Sends the user to another view
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigation through `window.location`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

#[cfg(target_arch = "wasm32")]
impl Navigator for BrowserNavigator {
    fn navigate(&self, route: &str) {
        let location = gloo::utils::window().location();
        if location.pathname().ok().as_deref() == Some(route) {
            return;
        }
        if let Err(e) = location.set_href(route) {
            tracing::warn!("Failed to navigate to {route}: {e:?}");
        }
    }
}

/// Records visited routes instead of navigating
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every route navigated to, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent route
    pub fn current(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&self, route: &str) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.to_string());
    }
}

/// Navigator used when none is supplied
pub fn default_navigator() -> Arc<dyn Navigator> {
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(BrowserNavigator)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Arc::new(MemoryNavigator::new())
    }
}
