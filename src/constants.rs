use rust_decimal::Decimal;

/// Smallest amount of currency treated as a real balance or transfer (0.01).
pub const SETTLEMENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

pub const MIN_PARTICIPANTS: usize = 1;
pub const MAX_PARTICIPANTS: usize = 10;

// Audit log actions
pub const SESSION_STARTED: &str = "SESSION_STARTED";
pub const SESSION_EXPIRED: &str = "SESSION_EXPIRED";
pub const BILL_FINALIZED: &str = "BILL_FINALIZED";
pub const BILL_PERSISTENCE_FAILED: &str = "BILL_PERSISTENCE_FAILED";
pub const BILLS_QUERIED: &str = "BILLS_QUERIED";
