//! Persistence backends for [`crate::auth::repository::AuthRepository`].

pub mod seaorm;
