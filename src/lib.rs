pub mod accounting;
pub mod config;
pub mod custody;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod events;
pub mod loan;
pub mod registry;
pub mod types;

// re-export key types
pub use accounting::{FundingSplit, InstallmentSplit};
pub use config::ProtocolConfig;
pub use custody::{CustodyGateway, InMemoryCustody};
pub use decimal::{Money, Rate};
pub use engine::LendingEngine;
pub use errors::{LendingError, Result};
pub use events::{Event, EventStore};
pub use loan::Loan;
pub use registry::LoanRegistry;
pub use types::{AccountId, CollateralAsset, Currency, LoanId, LoanStatus, LoanTerms};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
