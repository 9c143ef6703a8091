use chrono::NaiveTime;
use diesel::prelude::*;
use uuid::Uuid;

use super::JsonList;

/// The days and hours a job is worked
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::work_schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkSchedule {
    id: String,
    job_id: String,
    /// Entries from the days-schedule list, e.g. "Monday to Friday"
    schedules: JsonList,
    time_from: NaiveTime,
    time_to: NaiveTime,
}

impl WorkSchedule {
    pub fn new(job_id: String, schedules: JsonList, time_from: NaiveTime, time_to: NaiveTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_id,
            schedules,
            time_from,
            time_to,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_job_id(&self) -> String {
        self.job_id.clone()
    }

    pub fn get_schedules(&self) -> JsonList {
        self.schedules.clone()
    }

    pub fn get_time_from(&self) -> NaiveTime {
        self.time_from
    }

    pub fn get_time_to(&self) -> NaiveTime {
        self.time_to
    }
}
