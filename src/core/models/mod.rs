pub mod audit;
pub mod bill;
pub mod event;
pub mod session;
pub mod settlement;
