use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// An employer's rating of a worker hired for a job
///
/// At most one per (job, worker).
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::employer_feedbacks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EmployerFeedback {
    id: String,
    rating: i32,
    text: String,
    employer_id: Option<String>,
    worker_id: Option<String>,
    job_id: Option<String>,
    created_at: NaiveDateTime,
}

impl EmployerFeedback {
    pub fn new(job_id: String, employer_id: String, worker_id: String, rating: i32, text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            rating,
            text,
            employer_id: Some(employer_id),
            worker_id: Some(worker_id),
            job_id: Some(job_id),
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_rating(&self) -> i32 {
        self.rating
    }

    pub fn get_text(&self) -> String {
        self.text.clone()
    }

    pub fn get_employer_id(&self) -> Option<String> {
        self.employer_id.clone()
    }

    pub fn get_worker_id(&self) -> Option<String> {
        self.worker_id.clone()
    }

    pub fn get_job_id(&self) -> Option<String> {
        self.job_id.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}

/// A worker's rating of the employer they worked for
///
/// At most one per (job, employer).
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::worker_feedbacks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkerFeedback {
    id: String,
    rating: i32,
    text: String,
    worker_id: Option<String>,
    employer_id: Option<String>,
    job_id: Option<String>,
    created_at: NaiveDateTime,
}

impl WorkerFeedback {
    pub fn new(job_id: String, worker_id: String, employer_id: String, rating: i32, text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            rating,
            text,
            worker_id: Some(worker_id),
            employer_id: Some(employer_id),
            job_id: Some(job_id),
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_rating(&self) -> i32 {
        self.rating
    }

    pub fn get_text(&self) -> String {
        self.text.clone()
    }

    pub fn get_worker_id(&self) -> Option<String> {
        self.worker_id.clone()
    }

    pub fn get_employer_id(&self) -> Option<String> {
        self.employer_id.clone()
    }

    pub fn get_job_id(&self) -> Option<String> {
        self.job_id.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
