//! Repository for the `futsal_students` collection.

use std::collections::BTreeMap;

use futsal_core::student::Student;
use futsal_core::types::StudentId;

use super::{fetch, load_or_default, save};
use crate::collections::STUDENTS;
use crate::error::StoreError;
use crate::store::KeyValueStore;

pub type StudentMap = BTreeMap<StudentId, Student>;

/// The id is the map key; copy it into each record after decoding.
fn with_ids(mut students: StudentMap) -> StudentMap {
    for (id, student) in students.iter_mut() {
        student.id = id.clone();
    }
    students
}

pub struct StudentRepo;

impl StudentRepo {
    /// Every student, or an empty map if the collection is unreadable.
    pub async fn load_all(store: &dyn KeyValueStore) -> StudentMap {
        with_ids(load_or_default(store, STUDENTS).await)
    }

    /// Every student, surfacing read failures.
    pub async fn fetch_all(store: &dyn KeyValueStore) -> Result<StudentMap, StoreError> {
        Ok(with_ids(fetch(store, STUDENTS).await?))
    }

    pub async fn save_all(store: &dyn KeyValueStore, students: &StudentMap) -> Result<(), StoreError> {
        save(store, STUDENTS, students).await
    }

    pub async fn find_by_id(store: &dyn KeyValueStore, id: &str) -> Option<Student> {
        Self::load_all(store).await.remove(id)
    }

    /// Students ordered by id.
    pub async fn list(store: &dyn KeyValueStore) -> Vec<Student> {
        Self::load_all(store).await.into_values().collect()
    }
}
