//! Business flows composed from page objects

pub mod approval;
pub mod login;
pub mod sourcing;

pub use approval::ApprovalWorkflow;
pub use login::LoginWorkflow;
pub use sourcing::SourcingWorkflow;
