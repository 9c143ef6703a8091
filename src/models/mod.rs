/// Data models module
///
/// This module defines the database models of the marketplace: users and
/// their sessions, the worker and employer profiles, job postings with their
/// schedules, contracts, feedback, and the read-only lookup tables.

// Re-export all model types
mod json_list;
pub use json_list::JsonList;

mod user;
pub use user::User;

mod session;
pub use session::{Session, SESSION_LIFETIME_DAYS};

mod lookup;
pub use lookup::{DaysSchedule, JobTag, JobType, Profession, Shift};

mod worker_account;
pub use worker_account::{WorkerAccount, WorkerAccountChanges};

mod employer_account;
pub use employer_account::{EmployerAccount, EmployerAccountChanges};

mod job;
pub use job::{Job, JobChanges};

mod work_schedule;
pub use work_schedule::WorkSchedule;

mod contract;
pub use contract::{Contract, ContractStatus};

mod feedback;
pub use feedback::{EmployerFeedback, WorkerFeedback};
