//! Staff menu console

use std::sync::Arc;

use concierge_client::{ClientError, ConciergeBackend, ToggleRequest};
use concierge_core::{group_by_category, StaffMenuItem};
use parking_lot::RwLock;

use crate::AgentError;

pub struct StaffConsole {
    backend: Arc<dyn ConciergeBackend>,
    token: RwLock<Option<String>>,
    items: RwLock<Vec<StaffMenuItem>>,
}

impl StaffConsole {
    pub fn new(backend: Arc<dyn ConciergeBackend>) -> Self {
        Self {
            backend,
            token: RwLock::new(None),
            items: RwLock::new(Vec::new()),
        }
    }

    /// Fetch the staff menu with `password` as bearer token
    ///
    /// Only a successful fetch logs the console in. Returns the item count.
    pub async fn login(&self, password: &str) -> Result<usize, AgentError> {
        if password.is_empty() {
            return Err(AgentError::InvalidInput("password is empty".to_string()));
        }

        match self.backend.staff_menu(Some(password)).await {
            Ok(items) => {
                let count = items.len();
                *self.items.write() = items;
                *self.token.write() = Some(password.to_string());
                tracing::info!(items = count, "Staff console logged in");
                Ok(count)
            }
            Err(ClientError::Unauthorized) => {
                self.logout();
                Err(AgentError::Unauthorized)
            }
            Err(e) => Err(AgentError::Backend(e.to_string())),
        }
    }

    /// Re-fetch the menu with the current token
    pub async fn refresh(&self) -> Result<usize, AgentError> {
        let token = self.token.read().clone().ok_or(AgentError::NotLoggedIn)?;
        self.login(&token).await
    }

    pub fn logout(&self) {
        *self.token.write() = None;
        self.items.write().clear();
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.read().is_some()
    }

    pub fn items(&self) -> Vec<StaffMenuItem> {
        self.items.read().clone()
    }

    /// Flip one item optimistically; reverted if the backend refuses
    ///
    /// Returns the new availability.
    pub async fn toggle(&self, name: &str) -> Result<bool, AgentError> {
        let token = self.token.read().clone().ok_or(AgentError::NotLoggedIn)?;

        let available = {
            let mut items = self.items.write();
            let item = items
                .iter_mut()
                .find(|i| i.name == name)
                .ok_or_else(|| AgentError::InvalidInput(format!("unknown menu item: {}", name)))?;
            item.available = !item.available;
            item.available
        };

        let request = ToggleRequest {
            menu_name: name.to_string(),
            available,
        };
        match self.backend.toggle_menu(Some(&token), &request).await {
            Ok(()) => {
                tracing::info!(item = name, available, "Menu item toggled");
                Ok(available)
            }
            Err(e) => {
                tracing::debug!(item = name, error = %e, "Toggle failed, reverting");
                if let Some(item) = self.items.write().iter_mut().find(|i| i.name == name) {
                    item.available = !available;
                }
                Err(e.into())
            }
        }
    }

    /// Items grouped by category in first-seen order
    pub fn grouped(&self) -> Vec<(String, Vec<StaffMenuItem>)> {
        group_by_category(&self.items.read())
    }
}
