//! In-memory credential store for tests

use anyhow::Result;
use async_trait::async_trait;
use common::role::Role;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::CredentialStore;
use crate::models::{NewAccount, UserCredentials};

#[derive(Default)]
struct State {
    /// Keyed by email
    users: HashMap<String, UserCredentials>,
    profiles: HashMap<Uuid, (String, Uuid)>,
    stalls: Vec<(Uuid, String)>,
    roles: HashMap<Role, Uuid>,
    locations: HashSet<Uuid>,
}

#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    state: Arc<Mutex<State>>,
}

impl MemoryCredentialStore {
    /// Store seeded with all three roles and one location
    pub fn seeded() -> (Self, Uuid) {
        let store = Self::default();
        let location_id = Uuid::new_v4();
        {
            let mut state = store.state.lock().unwrap();
            for role in Role::ALL {
                state.roles.insert(role, Uuid::new_v4());
            }
            state.locations.insert(location_id);
        }
        (store, location_id)
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }

    pub fn profile_count(&self) -> usize {
        self.state.lock().unwrap().profiles.len()
    }

    pub fn stall_names_of(&self, user_id: Uuid) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .stalls
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, name)| name.clone())
            .collect()
    }

    pub fn password_hash_of(&self, email: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .users
            .get(email)
            .map(|user| user.password_hash.clone())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.get(email).cloned())
    }

    async fn role_id(&self, role: Role) -> Result<Option<Uuid>> {
        Ok(self.state.lock().unwrap().roles.get(&role).copied())
    }

    async fn location_exists(&self, location_id: Uuid) -> Result<bool> {
        Ok(self.state.lock().unwrap().locations.contains(&location_id))
    }

    async fn create_account(&self, account: &NewAccount) -> Result<Option<Uuid>> {
        let mut state = self.state.lock().unwrap();
        if state.users.contains_key(&account.email) {
            return Ok(None);
        }

        let role = state
            .roles
            .iter()
            .find(|(_, id)| **id == account.role_id)
            .map(|(role, _)| *role)
            .ok_or_else(|| anyhow::anyhow!("unknown role id {}", account.role_id))?;

        let user_id = Uuid::new_v4();
        let user = UserCredentials {
            user_id,
            password_hash: account.password_hash.clone(),
            role,
        };
        state.users.insert(account.email.clone(), user);
        state
            .profiles
            .insert(user_id, (account.telepon.clone(), account.location_id));
        if let Some(name) = &account.stall_name {
            state.stalls.push((user_id, name.clone()));
        }

        Ok(Some(user_id))
    }
}
