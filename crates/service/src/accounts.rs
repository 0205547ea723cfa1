//! Student account lifecycle and admin credentials.

use std::sync::Arc;

use chrono::Utc;
use futsal_core::admin::Admin;
use futsal_core::error::CoreError;
use futsal_core::roles::ROLE_SUPER_ADMIN;
use futsal_core::security_event::events;
use futsal_core::student::{
    generate_password, BanRecord, CreateStudent, Student, StudentStatus, UpdateStudent,
    STUDENT_ENTITY,
};
use futsal_core::types::Date;
use futsal_db::repositories::admin_repo::AdminMap;
use futsal_db::repositories::student_repo::StudentMap;
use futsal_db::repositories::{AdminRepo, StudentRepo};
use futsal_db::{seed, KeyValueStore};
use serde_json::json;
use tokio::sync::Mutex;

use crate::auth::authenticate_admin;
use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{ServiceError, ServiceResult};
use crate::security_log::SecurityLog;

/// A newly registered student together with the plaintext password.
///
/// This is the only place the plaintext is ever available.
#[derive(Debug, Clone)]
pub struct Registration {
    pub student: Student,
    pub password: String,
}

/// Creates, edits, bans, and deletes students; rotates admin passwords.
///
/// Every write is a read-modify-write of the whole students collection,
/// serialized by `write_lock`.
pub struct AccountManager {
    store: Arc<dyn KeyValueStore>,
    security: SecurityLog,
    write_lock: Mutex<()>,
}

impl AccountManager {
    pub fn new(store: Arc<dyn KeyValueStore>, security: SecurityLog) -> Self {
        Self {
            store,
            security,
            write_lock: Mutex::new(()),
        }
    }

    // -----------------------------------------------------------------------
    // Students
    // -----------------------------------------------------------------------

    /// Register a student. A password is generated when none is given.
    pub async fn register(&self, request: CreateStudent, today: Date) -> ServiceResult<Registration> {
        request.validate_request()?;
        let id = request.id.trim().to_string();
        if id.is_empty() {
            return Err(CoreError::Validation("Student ID is required".into()).into());
        }

        // Kept verbatim: login does not trim.
        let password = match request.password.as_deref() {
            Some(given) if !given.trim().is_empty() => {
                validate_password_strength(given)?;
                given.to_string()
            }
            _ => generate_password(&mut rand::rng()),
        };
        let password_hash = hash_password(&password)?;

        let _guard = self.write_lock.lock().await;
        let mut students = StudentRepo::fetch_all(self.store.as_ref())
            .await
            .map_err(ServiceError::Load)?;
        if students.contains_key(&id) {
            return Err(CoreError::AlreadyExists {
                entity: STUDENT_ENTITY,
                id,
            }
            .into());
        }

        let student = Student {
            id: id.clone(),
            name: request.name.trim().to_string(),
            program: request.program.trim().to_string(),
            password_hash,
            email: request.email.trim().to_string(),
            phone: request.phone.trim().to_string(),
            registered_date: today,
            status: StudentStatus::Active,
            ban_history: Vec::new(),
        };
        students.insert(id.clone(), student.clone());
        StudentRepo::save_all(self.store.as_ref(), &students).await?;

        tracing::info!(student_id = %id, "Student registered");
        Ok(Registration { student, password })
    }

    pub async fn get(&self, student_id: &str) -> ServiceResult<Student> {
        StudentRepo::find_by_id(self.store.as_ref(), student_id)
            .await
            .ok_or_else(|| CoreError::not_found(STUDENT_ENTITY, student_id).into())
    }

    /// Students ordered by id.
    pub async fn list(&self) -> Vec<Student> {
        StudentRepo::list(self.store.as_ref()).await
    }

    /// Apply the provided fields of `update`.
    pub async fn update(&self, student_id: &str, update: UpdateStudent) -> ServiceResult<Student> {
        update.validate_request()?;
        if update.is_empty() {
            return Err(CoreError::Validation("Nothing to update".into()).into());
        }
        let student = self
            .modify(student_id, |student| student.apply_update(&update))
            .await?;
        tracing::info!(student_id, "Student updated");
        Ok(student)
    }

    /// Remove a student. Their bookings are kept.
    pub async fn delete(&self, student_id: &str) -> ServiceResult<Student> {
        let _guard = self.write_lock.lock().await;
        let mut students = StudentRepo::fetch_all(self.store.as_ref())
            .await
            .map_err(ServiceError::Load)?;
        let removed = students
            .remove(student_id)
            .ok_or_else(|| CoreError::not_found(STUDENT_ENTITY, student_id))?;
        StudentRepo::save_all(self.store.as_ref(), &students).await?;

        tracing::info!(student_id, "Student deleted");
        Ok(removed)
    }

    /// Remove every student. Returns how many were removed.
    pub async fn clear_students(&self) -> ServiceResult<usize> {
        let _guard = self.write_lock.lock().await;
        let removed = StudentRepo::load_all(self.store.as_ref()).await.len();
        StudentRepo::save_all(self.store.as_ref(), &StudentMap::new()).await?;
        tracing::info!(removed, "Student accounts cleared");
        Ok(removed)
    }

    /// Replace a student's password.
    pub async fn set_password(
        &self,
        student_id: &str,
        new_password: &str,
        actor: &str,
    ) -> ServiceResult<()> {
        validate_password_strength(new_password)?;
        let password_hash = hash_password(new_password)?;

        self.modify(student_id, |student| student.password_hash = password_hash)
            .await?;

        self.security
            .record(
                events::STUDENT_PASSWORD_CHANGED,
                json!({ "studentId": student_id }),
                actor,
            )
            .await;
        tracing::info!(student_id, "Student password changed");
        Ok(())
    }

    /// Ban a student and append the ban to their history.
    pub async fn ban(
        &self,
        student_id: &str,
        reason: &str,
        duration: &str,
        administrator: &str,
    ) -> ServiceResult<Student> {
        let record = BanRecord {
            date: Utc::now(),
            reason: reason.trim().to_string(),
            duration: duration.trim().to_string(),
            administrator: administrator.to_string(),
        };
        let student = self.modify(student_id, |student| student.ban(record)).await?;

        self.security
            .record(
                events::STUDENT_BANNED,
                json!({ "studentId": student_id, "reason": reason.trim(), "duration": duration.trim() }),
                administrator,
            )
            .await;
        tracing::info!(student_id, "Student banned");
        Ok(student)
    }

    /// Reactivate a banned student. The ban history is kept.
    pub async fn unban(&self, student_id: &str, administrator: &str) -> ServiceResult<Student> {
        let student = self.modify(student_id, Student::unban).await?;

        self.security
            .record(
                events::STUDENT_UNBANNED,
                json!({ "studentId": student_id }),
                administrator,
            )
            .await;
        tracing::info!(student_id, "Student unbanned");
        Ok(student)
    }

    // -----------------------------------------------------------------------
    // Admins
    // -----------------------------------------------------------------------

    pub async fn verify_admin(&self, username: &str, password: &str) -> ServiceResult<bool> {
        Ok(authenticate_admin(self.store.as_ref(), username, password)
            .await?
            .is_some())
    }

    /// Change an admin's password after checking the current one.
    pub async fn rotate_admin_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        let Some(mut admin) = authenticate_admin(self.store.as_ref(), username, current_password).await?
        else {
            return Err(CoreError::Unauthorized("Current admin password is incorrect".into()).into());
        };
        validate_password_strength(new_password)?;
        admin.password_hash = hash_password(new_password)?;

        AdminRepo::upsert(self.store.as_ref(), &admin).await?;

        self.security
            .record(
                events::ADMIN_PASSWORD_ROTATED,
                format!("Admin {username} changed their password"),
                username,
            )
            .await;
        tracing::info!(username, "Admin password rotated");
        Ok(())
    }

    /// Create the first super admin unless that username already exists.
    pub async fn seed_admin(&self, username: &str, password: &str) -> ServiceResult<bool> {
        validate_password_strength(password)?;
        let admin = Admin {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role: ROLE_SUPER_ADMIN.to_string(),
        };
        Ok(seed::ensure_admin(self.store.as_ref(), admin).await?)
    }

    /// Replace every admin account with a single super admin.
    pub async fn reset_admins(&self, username: &str, password: &str) -> ServiceResult<()> {
        validate_password_strength(password)?;
        let admin = Admin {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role: ROLE_SUPER_ADMIN.to_string(),
        };
        let admins = AdminMap::from([(admin.username.clone(), admin)]);
        AdminRepo::save_all(self.store.as_ref(), &admins).await?;
        tracing::info!(username, "Admin accounts reset");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn modify<F>(&self, student_id: &str, apply: F) -> ServiceResult<Student>
    where
        F: FnOnce(&mut Student),
    {
        let _guard = self.write_lock.lock().await;
        let mut students = StudentRepo::fetch_all(self.store.as_ref())
            .await
            .map_err(ServiceError::Load)?;
        let student = students
            .get_mut(student_id)
            .ok_or_else(|| CoreError::not_found(STUDENT_ENTITY, student_id))?;
        apply(student);
        let updated = student.clone();
        StudentRepo::save_all(self.store.as_ref(), &students).await?;
        Ok(updated)
    }
}
