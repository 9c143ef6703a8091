use diesel::prelude::*;
use serde::Serialize;

/// Declares a lookup-table model: an integer id and a unique name
macro_rules! lookup_model {
    ($(#[$meta:meta])* $name:ident, $table:ident) => {
        $(#[$meta])*
        #[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq, Serialize)]
        #[diesel(table_name = crate::schema::$table)]
        #[diesel(check_for_backend(diesel::sqlite::Sqlite))]
        pub struct $name {
            id: i32,
            name: String,
        }

        impl $name {
            pub fn new_with_fields(id: i32, name: String) -> Self {
                Self { id, name }
            }

            pub fn get_id(&self) -> i32 {
                self.id
            }

            pub fn get_name(&self) -> String {
                self.name.clone()
            }
        }
    };
}

lookup_model!(
    /// A trade a worker can offer, addressed on the wire by name
    Profession,
    professions
);

lookup_model!(
    /// An employment type such as "Full-Time"
    JobType,
    job_types
);

lookup_model!(
    /// A shift pattern such as "Night Shift"
    Shift,
    shifts
);

lookup_model!(
    /// A day or range of days a job runs on
    DaysSchedule,
    days_schedules
);

lookup_model!(
    /// A highlight attached to job postings, e.g. "Urgently hiring"
    JobTag,
    job_tags
);
