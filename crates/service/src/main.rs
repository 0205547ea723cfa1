use chrono::Local;
use futsal_core::opening_hours;
use futsal_core::slots::TimeSlot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use futsal_service::config::ServiceConfig;
use futsal_service::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "futsal_service=debug,futsal_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServiceConfig::from_env();
    tracing::info!(
        database_url = %config.database_url,
        horizon_days = config.booking_horizon_days,
        "Loaded service configuration"
    );

    // --- Bootstrap ---
    let state = AppState::open(config)
        .await
        .expect("Failed to open the booking store");

    // --- Report ---
    let now = Local::now();
    let today = now.date_naive();
    tracing::info!(status = opening_hours::status_line(now.time()), "Venue");

    let stats = state.dashboard.statistics(today).await;
    tracing::info!(
        students = stats.total_students,
        banned = stats.banned_students,
        bookings = stats.total_bookings,
        confirmed = stats.confirmed_bookings,
        cancelled = stats.cancelled_bookings,
        today = stats.today_bookings,
        "Store statistics"
    );

    for booking in state.dashboard.upcoming_bookings(today).await {
        tracing::info!(
            booking_id = %booking.booking_id,
            date = %booking.date,
            slot = %booking.time.display_range(),
            team = %booking.team_name,
            "Upcoming booking"
        );
    }

    if let Some(tomorrow) = today.succ_opt() {
        let free: Vec<TimeSlot> = state.desk.available_slots(tomorrow).await;
        tracing::info!(date = %tomorrow, free = free.len(), "Slots available tomorrow");
    }
}
