mod common;

use assert_matches::assert_matches;
use futsal_core::booking::BookingStatus;
use futsal_core::error::CoreError;
use futsal_service::desk::BookingForm;
use futsal_service::error::ServiceError;
use futsal_service::state::AppState;

use common::{date, form, memory_state, register, today, STUDENT_PASSWORD};

async fn logged_in(id: &str) -> AppState {
    let state = memory_state().await;
    register(&state, id).await;
    state
        .sessions
        .login_student(id, STUDENT_PASSWORD)
        .await
        .unwrap();
    state
}

fn validation_message(err: ServiceError) -> String {
    match err {
        ServiceError::Core(CoreError::Validation(msg)) => msg,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_booking_requires_student_session() {
    let state = memory_state().await;
    let err = state
        .desk
        .book(form("2025-01-10", "10:15"), today())
        .await
        .unwrap_err();
    assert_eq!(err.notice().message, "Please login as a student to book futsal");
}

#[tokio::test]
async fn test_books_for_session_student() {
    let state = logged_in("TIC001").await;
    let booking = state
        .desk
        .book(form("2025-01-10", "10:15"), today())
        .await
        .unwrap();

    assert_eq!(booking.student_id, "TIC001");
    assert_eq!(booking.student_name, "Student TIC001");
    assert_eq!(booking.date, date("2025-01-10"));
    assert_eq!(booking.time.label(), "10:15");
    assert!(!state
        .desk
        .available_slots(date("2025-01-10"))
        .await
        .contains(&booking.time));
}

#[tokio::test]
async fn test_required_fields() {
    let state = logged_in("TIC001").await;
    let mut missing_team = form("2025-01-10", "10:15");
    missing_team.team_name = "   ".to_string();

    let err = state.desk.book(missing_team, today()).await.unwrap_err();
    assert_eq!(validation_message(err), "Please fill in all required fields");

    let err = state
        .desk
        .book(BookingForm::default(), today())
        .await
        .unwrap_err();
    assert_eq!(validation_message(err), "Please fill in all required fields");
}

#[tokio::test]
async fn test_field_formats() {
    let state = logged_in("TIC001").await;

    let mut bad_phone = form("2025-01-10", "10:15");
    bad_phone.phone = "call me".to_string();
    let err = state.desk.book(bad_phone, today()).await.unwrap_err();
    assert_eq!(validation_message(err), "Please enter a valid phone number");

    let err = state
        .desk
        .book(form("10/01/2025", "10:15"), today())
        .await
        .unwrap_err();
    assert_eq!(validation_message(err), "Please select a valid date");

    let err = state
        .desk
        .book(form("2025-01-10", "10:30"), today())
        .await
        .unwrap_err();
    assert!(validation_message(err).contains("Invalid time slot"));
}

#[tokio::test]
async fn test_booking_window() {
    let state = logged_in("TIC001").await;

    for day in ["2025-01-07", "2025-01-08", "2025-01-14"] {
        assert_matches!(
            state.desk.book(form(day, "10:15"), today()).await,
            Err(ServiceError::Core(CoreError::Validation(_))),
            "{day} should be outside the window"
        );
    }

    state
        .desk
        .book(form("2025-01-13", "10:15"), today())
        .await
        .unwrap();
    state
        .desk
        .book(form("2025-01-09", "10:15"), today())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_my_bookings_overview() {
    let state = logged_in("TIC001").await;

    // Seed history directly through the allocator, which has no window.
    state
        .allocator
        .create_booking(common::request("TIC001", "2025-01-02", "10:15"))
        .await
        .unwrap();
    let cancelled = state
        .allocator
        .create_booking(common::request("TIC001", "2025-01-11", "12:15"))
        .await
        .unwrap();
    state.allocator.cancel_booking(&cancelled.booking_id).await.unwrap();
    state
        .desk
        .book(form("2025-01-10", "10:15"), today())
        .await
        .unwrap();
    state
        .allocator
        .create_booking(common::request("OTHER", "2025-01-12", "10:15"))
        .await
        .unwrap();

    let overview = state.desk.my_bookings(today()).await.unwrap();
    assert_eq!(overview.active.len(), 1);
    assert_eq!(overview.past.len(), 1);
    assert_eq!(overview.cancelled.len(), 1);
    assert_eq!(overview.active[0].date, date("2025-01-10"));
}

#[tokio::test]
async fn test_cancel_only_own_booking() {
    let state = logged_in("TIC001").await;
    let other = state
        .allocator
        .create_booking(common::request("TIC002", "2025-01-10", "10:15"))
        .await
        .unwrap();
    let mine = state
        .desk
        .book(form("2025-01-10", "11:15"), today())
        .await
        .unwrap();

    assert_matches!(
        state.desk.cancel_my_booking(&other.booking_id).await,
        Err(ServiceError::Core(CoreError::NotFound { .. }))
    );
    assert_eq!(
        state.allocator.get_booking(&other.booking_id).await.unwrap().status,
        BookingStatus::Confirmed
    );

    let cancelled = state.desk.cancel_my_booking(&mine.booking_id).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
}
