//! Account module: repository seam, storage backends and the application service.

pub mod repository;
pub mod repo;
pub mod service;

pub use models::account::Account;
pub use repository::AccountRepository;
pub use service::AccountService;
