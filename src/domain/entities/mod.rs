//! Core business entities.

pub mod account;
pub mod qr_record;
pub mod scan_event;

pub use account::{Account, Plan};
pub use qr_record::{Customization, EcLevel, NewQrRecord, QrPatch, QrRecord};
pub use scan_event::{NewScanEvent, ScanEvent};
