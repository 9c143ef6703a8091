pub mod employer;
pub mod job;
pub mod meta;
pub mod worker;
