//! Keys of the persisted collections.

/// Map of student id to student record.
pub const STUDENTS: &str = "futsal_students";

/// Ordered sequence of bookings.
pub const BOOKINGS: &str = "futsal_bookings";

/// Map of username to admin record.
pub const ADMINS: &str = "futsal_admins";

/// The most recent security events.
pub const SECURITY_LOGS: &str = "security_logs";

/// Ids of deleted bookings, never issued again.
pub const RETIRED_BOOKING_IDS: &str = "futsal_retired_booking_ids";

/// The logged-in session, if any.
pub const SESSION: &str = "futsal_session";
