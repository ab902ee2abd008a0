//! Repository traits abstracting the persistence layer.

pub mod account_repository;
pub mod qr_repository;
pub mod scan_repository;

pub use account_repository::AccountRepository;
pub use qr_repository::QrRepository;
pub use scan_repository::{DayCount, FieldCount, ScanRepository, ScanScope};

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use qr_repository::MockQrRepository;
#[cfg(test)]
pub use scan_repository::MockScanRepository;
