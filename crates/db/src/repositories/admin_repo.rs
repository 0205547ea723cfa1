//! Repository for the `futsal_admins` collection.

use std::collections::BTreeMap;

use futsal_core::admin::Admin;

use super::{fetch, load_or_default, save};
use crate::collections::ADMINS;
use crate::error::StoreError;
use crate::store::KeyValueStore;

pub type AdminMap = BTreeMap<String, Admin>;

pub struct AdminRepo;

impl AdminRepo {
    pub async fn load_all(store: &dyn KeyValueStore) -> AdminMap {
        load_or_default(store, ADMINS).await
    }

    pub async fn fetch_all(store: &dyn KeyValueStore) -> Result<AdminMap, StoreError> {
        fetch(store, ADMINS).await
    }

    pub async fn find_by_username(store: &dyn KeyValueStore, username: &str) -> Option<Admin> {
        Self::load_all(store).await.remove(username)
    }

    pub async fn save_all(store: &dyn KeyValueStore, admins: &AdminMap) -> Result<(), StoreError> {
        save(store, ADMINS, admins).await
    }

    /// Insert or replace one admin, keyed by username.
    pub async fn upsert(store: &dyn KeyValueStore, admin: &Admin) -> Result<(), StoreError> {
        let mut admins = Self::fetch_all(store).await?;
        admins.insert(admin.username.clone(), admin.clone());
        save(store, ADMINS, &admins).await
    }
}
