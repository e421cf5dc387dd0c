//! Framework-agnostic business logic. Every operation takes a `&DatabaseConnection`
//! and returns [`crate::errors::Result`]; nothing here knows about HTTP.

/// Password hashing and token issuing
pub mod auth;
/// Budget CRUD and seeding
pub mod budget;
/// Category validation and autocomplete
pub mod category;
/// Expense CRUD and status changes
pub mod expense;
/// CSV rendering of listings
pub mod export;
/// Listing filters
pub mod filter;
/// Income CRUD
pub mod income;
/// Budget aggregation and financial reports
pub mod report;
/// Support tickets and replies
pub mod ticket;
/// User accounts
pub mod user;
