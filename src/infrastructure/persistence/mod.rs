//! PostgreSQL repository implementations.

pub mod pg_account_repository;
pub mod pg_qr_repository;
pub mod pg_scan_repository;

pub use pg_account_repository::PgAccountRepository;
pub use pg_qr_repository::PgQrRepository;
pub use pg_scan_repository::PgScanRepository;
