//! Timesheet and leave workflow service: entries, weekly submission,
//! leave requests, a manager approval queue and role-scoped notifications.

pub mod api;
pub mod auth;
pub mod config;
pub mod dispatcher;
pub mod docs;
pub mod engine;
pub mod model;
pub mod query;
pub mod routes;
pub mod seed;
