//! Validation and generation of checksummed payment identifiers: IBAN and
//! BIC, SEPA creditor identifiers, and payment card numbers.
//!
//! The engines are pure functions over strings and static tables; nothing
//! in here touches the network or the filesystem. CSV batch processing and
//! the reference-data directory loader live at the edges (`batch`,
//! `lookup`) and are the only modules that do I/O.

pub mod batch;
pub mod card;
pub mod checksum;
pub mod creditor_id;
pub mod error;
pub mod iban;
pub mod logging;
pub mod lookup;
pub mod reference;
pub mod sample;

pub use error::IdentifierError;
pub use reference::CountryCode;
