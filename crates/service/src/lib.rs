//! Service layer for account records.
//! - `AccountRepository` is the persistence seam; in-memory and SeaORM backends implement it.
//! - `AccountService` holds the business rules (not-found checks, update merging).

pub mod errors;
pub mod account;
