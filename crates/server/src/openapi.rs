use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub username: String, pub full_name: String, pub email: String, pub phone: Option<String>, pub password: String }

/// `username` also accepts the account email.
#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct BulkAttendanceRequest {
    pub course_id: Uuid,
    pub student_ids: Vec<Uuid>,
    /// PRESENT, ABSENT, LATE or EXCUSED
    pub status: String,
    pub remarks: Option<String>,
    /// Defaults to today (UTC)
    #[schema(example = "2025-03-03")]
    pub date: Option<String>,
}

#[derive(ToSchema)]
pub struct BookingSlotRequest {
    pub facility_id: Uuid,
    #[schema(example = "2025-03-03")]
    pub date: String,
    #[schema(example = "09:00:00")]
    pub start_time: String,
    #[schema(example = "10:30:00")]
    pub end_time: String,
    pub purpose: String,
    pub notes: Option<String>,
}

#[derive(ToSchema)]
pub struct ResourceBookingRequest {
    pub resource_id: Uuid,
    #[schema(example = "2025-03-03T09:00:00Z")]
    pub start_time: String,
    #[schema(example = "2025-03-03T09:00:00Z")]
    pub end_time: String,
    pub purpose: Option<String>,
    pub remarks: Option<String>,
}

#[derive(ToSchema)]
pub struct OrderLineRequest { pub item_id: Uuid, pub quantity: i32, pub special_instructions: Option<String> }

#[derive(ToSchema)]
pub struct OrderRequest {
    pub items: Vec<OrderLineRequest>,
    pub payment_method: Option<String>,
    pub delivery_location: Option<String>,
    pub remarks: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::users::list,
        crate::routes::courses::list,
        crate::routes::attendance::bulk_create,
        crate::routes::facility_bookings::availability,
        crate::routes::facility_bookings::create,
        crate::routes::bookings::create,
        crate::routes::notifications::broadcast,
        crate::routes::cafeteria::place_order,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            BulkAttendanceRequest,
            BookingSlotRequest,
            ResourceBookingRequest,
            OrderLineRequest,
            OrderRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "courses"),
        (name = "attendance"),
        (name = "facility-bookings"),
        (name = "bookings"),
        (name = "notifications"),
        (name = "cafeteria")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_booking_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/facility-bookings"));
        assert!(doc.paths.paths.contains_key("/api/auth/login"));
    }
}
