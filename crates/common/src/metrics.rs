use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static BOOKINGS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "campus_bookings_created_total",
        "Total facility and resource bookings accepted"
    )
    .expect("register bookings_created_total")
});

pub static BOOKING_CONFLICTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "campus_booking_conflicts_total",
        "Total bookings rejected because of an overlapping slot"
    )
    .expect("register booking_conflicts_total")
});

pub static ATTENDANCE_WRITTEN_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "campus_attendance_records_written_total",
        "Total attendance records created or updated"
    )
    .expect("register attendance_records_written_total")
});

/// Render the default registry in the text exposition format.
pub fn encode_metrics() -> (u16, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (500, format!("metrics encode error: {e}"));
    }
    (200, String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        BOOKING_CONFLICTS_TOTAL.inc();
        let (status, body) = encode_metrics();
        assert_eq!(status, 200);
        assert!(body.contains("campus_booking_conflicts_total"));
    }
}
