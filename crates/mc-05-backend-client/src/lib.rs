//! # Backend Client (MC-05)
//!
//! Typed client for the peer-review REST backend.
//!
//! ## Endpoints
//!
//! | Method | Path                 | Auth   | Client call                        |
//! |--------|----------------------|--------|------------------------------------|
//! | POST   | `/register`          | -      | [`BackendClient::register`]        |
//! | POST   | `/login`             | -      | [`BackendClient::login`]           |
//! | GET    | `/api/user`          | bearer | [`BackendClient::current_user`]    |
//! | POST   | `/api/rate`          | bearer | [`BackendClient::rate`]            |
//! | GET    | `/api/reviews`       | bearer | [`BackendClient::reviews`]         |
//! | GET    | `/api/task-docs`     | bearer | [`BackendClient::task_docs`]       |
//! | POST   | `/api/task-docs`     | bearer | [`BackendClient::create_task_doc`] |
//! | GET    | `/api/meet-reports`  | bearer | [`BackendClient::meet_reports`]    |
//! | POST   | `/api/meet-reports`  | bearer | [`BackendClient::create_meet_report`] |
//! | GET    | `/api/export-reviews`| bearer | [`BackendClient::export_reviews`]  |
//!
//! Error responses become [`BackendError::Api`] with the body's `error` or
//! `message` field.

pub mod client;
pub mod domain;

// Re-export public API
pub use client::{BackendClient, DEFAULT_BACKEND_URL, TOKEN_KEY};
pub use domain::errors::{BackendError, DEFAULT_SERVER_ERROR};
pub use domain::types::{
    LoginRequest, LoginResponse, MeetReport, NewMeetReport, NewTaskDoc, RatingRequest,
    RegisterRequest, Review, TaskDoc, User,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
