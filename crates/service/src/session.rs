//! Login state.
//!
//! [`SessionManager`] owns the single current session of this process and
//! mirrors it to the `futsal_session` key so it survives a restart.

use std::sync::Arc;

use chrono::Utc;
use futsal_core::error::CoreError;
use futsal_core::roles::is_valid_role;
use futsal_core::security_event::{events, ANONYMOUS_USER};
use futsal_core::session::{Principal, Session};
use futsal_core::types::StudentId;
use futsal_db::repositories::{AdminRepo, SessionRepo, StudentRepo};
use futsal_db::KeyValueStore;
use serde_json::json;
use tokio::sync::RwLock;

use crate::auth::authenticate_admin;
use crate::auth::password::verify_password;
use crate::error::ServiceResult;
use crate::security_log::SecurityLog;

const INVALID_STUDENT_LOGIN: &str = "Invalid student ID or password";
const BANNED_STUDENT_LOGIN: &str = "Your account has been banned. Please contact admin.";
const INVALID_ADMIN_LOGIN: &str = "Admin username or password is incorrect";

/// The logged-in student, as needed to act on their behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentIdentity {
    pub student_id: StudentId,
    pub name: String,
}

pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    security: SecurityLog,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>, security: SecurityLog) -> Self {
        Self {
            store,
            security,
            current: RwLock::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Login / logout
    // -----------------------------------------------------------------------

    /// Authenticate a student and start their session.
    ///
    /// A banned account is refused before the password is looked at.
    pub async fn login_student(&self, student_id: &str, password: &str) -> ServiceResult<Session> {
        let student_id = student_id.trim();
        if student_id.is_empty() || password.is_empty() {
            return Err(
                CoreError::Validation("Please enter both Student ID and Password".into()).into(),
            );
        }

        let Some(student) = StudentRepo::find_by_id(self.store.as_ref(), student_id).await else {
            self.record_failure(events::STUDENT_LOGIN_FAILED, student_id).await;
            return Err(CoreError::Unauthorized(INVALID_STUDENT_LOGIN.into()).into());
        };

        if student.is_banned() {
            self.record_failure(events::STUDENT_LOGIN_BANNED, student_id).await;
            return Err(CoreError::Forbidden(BANNED_STUDENT_LOGIN.into()).into());
        }

        if !verify_password(password, &student.password_hash)? {
            self.record_failure(events::STUDENT_LOGIN_FAILED, student_id).await;
            return Err(CoreError::Unauthorized(INVALID_STUDENT_LOGIN.into()).into());
        }

        let session = Session {
            principal: Principal::Student {
                student_id: student.id.clone(),
                name: student.name,
                program: student.program,
                email: student.email,
                phone: student.phone,
            },
            started_at: Utc::now(),
        };
        self.begin(session.clone()).await?;

        self.security
            .record(
                events::STUDENT_LOGIN,
                format!("Student {student_id} logged in successfully"),
                student_id,
            )
            .await;
        tracing::info!(student_id, "Student logged in");
        Ok(session)
    }

    /// Authenticate an admin and start their session.
    pub async fn login_admin(&self, username: &str, password: &str) -> ServiceResult<Session> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(
                CoreError::Validation("Please enter both Username and Password".into()).into(),
            );
        }

        // Every attempt is logged before the credentials are checked.
        self.security
            .record(
                events::ADMIN_LOGIN_ATTEMPT,
                json!({ "username": username, "timestamp": Utc::now() }),
                &self.user_label().await,
            )
            .await;

        let Some(admin) = authenticate_admin(self.store.as_ref(), username, password).await? else {
            self.record_failure(events::ADMIN_LOGIN_FAILED, username).await;
            return Err(CoreError::Unauthorized(INVALID_ADMIN_LOGIN.into()).into());
        };

        let session = Session {
            principal: Principal::Admin {
                username: admin.username,
                role: admin.role,
            },
            started_at: Utc::now(),
        };
        self.begin(session.clone()).await?;

        self.security
            .record(
                events::ADMIN_LOGIN,
                format!("Admin {username} logged in successfully"),
                username,
            )
            .await;
        tracing::info!(username, "Admin logged in");
        Ok(session)
    }

    /// End the current session. Logging out with no session is a no-op.
    pub async fn logout(&self) -> ServiceResult<Option<Session>> {
        let mut current = self.current.write().await;
        let Some(session) = current.clone() else {
            return Ok(None);
        };

        SessionRepo::clear(self.store.as_ref()).await?;
        *current = None;
        drop(current);

        let user = session.principal.user_label();
        self.security
            .record(events::LOGOUT, format!("{user} logged out"), user)
            .await;
        tracing::info!(user, "Logged out");
        Ok(Some(session))
    }

    // -----------------------------------------------------------------------
    // Current session
    // -----------------------------------------------------------------------

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// Reload the persisted session after a restart.
    ///
    /// A session whose account has since been deleted, or whose student has
    /// been banned, is discarded.
    pub async fn restore(&self) -> Option<Session> {
        let session = SessionRepo::load(self.store.as_ref()).await?;

        let still_valid = match &session.principal {
            Principal::Student { student_id, .. } => {
                StudentRepo::find_by_id(self.store.as_ref(), student_id)
                    .await
                    .is_some_and(|s| !s.is_banned())
            }
            Principal::Admin { username, role } => {
                is_valid_role(role)
                    && AdminRepo::find_by_username(self.store.as_ref(), username)
                        .await
                        .is_some()
            }
        };

        if !still_valid {
            tracing::info!(user = session.principal.user_label(), "Discarding stale session");
            if let Err(e) = SessionRepo::clear(self.store.as_ref()).await {
                tracing::warn!(error = %e, "Failed to clear stale session");
            }
            return None;
        }

        tracing::info!(user = session.principal.user_label(), "Session restored");
        *self.current.write().await = Some(session.clone());
        Some(session)
    }

    /// The logged-in student, or an error if nobody or an admin is logged in.
    pub async fn require_student(&self) -> ServiceResult<StudentIdentity> {
        match self.current().await.map(|s| s.principal) {
            Some(Principal::Student {
                student_id, name, ..
            }) => Ok(StudentIdentity { student_id, name }),
            _ => Err(
                CoreError::Unauthorized("Please login as a student to book futsal".into()).into(),
            ),
        }
    }

    /// The logged-in admin's username, or an error otherwise.
    pub async fn require_admin(&self) -> ServiceResult<String> {
        match self.current().await.map(|s| s.principal) {
            Some(Principal::Admin { username, .. }) => Ok(username),
            Some(Principal::Student { .. }) => {
                Err(CoreError::Forbidden("Admin access required".into()).into())
            }
            None => Err(CoreError::Unauthorized("Please login as admin".into()).into()),
        }
    }

    /// Identifier recorded as the acting user in security events.
    pub async fn user_label(&self) -> String {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.principal.user_label().to_string())
            .unwrap_or_else(|| ANONYMOUS_USER.to_string())
    }

    async fn begin(&self, session: Session) -> ServiceResult<()> {
        SessionRepo::save(self.store.as_ref(), &session).await?;
        *self.current.write().await = Some(session);
        Ok(())
    }

    async fn record_failure(&self, event: &str, attempted: &str) {
        tracing::info!(event, attempted, "Login refused");
        self.security
            .record(
                event,
                json!({ "attempted": attempted }),
                &self.user_label().await,
            )
            .await;
    }
}
