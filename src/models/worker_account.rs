use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::schema::worker_accounts;

/// A worker profile, at most one per user
///
/// The primary key is the owning user's id. `rating` and `verified_id` are
/// maintained by staff and never taken from request bodies.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = worker_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkerAccount {
    user_id: String,

    /// Stored media path of the profile photo
    photo: Option<String>,

    profession_id: i32,
    first_name: String,
    last_name: String,
    birthdate: NaiveDate,
    phone: String,

    /// 0..=5
    rating: i32,

    location: String,
    about: String,
    verified_id: bool,
    driving_license: bool,
    last_update: NaiveDateTime,
}

/// Field changes for a worker account
///
/// `None` leaves a column untouched, so the same struct serves partial
/// updates and, when fully populated, account creation. `last_update` is
/// always written.
#[derive(AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = worker_accounts)]
pub struct WorkerAccountChanges {
    pub photo: Option<Option<String>>,
    pub profession_id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub about: Option<String>,
    pub driving_license: Option<bool>,
    pub last_update: NaiveDateTime,
}

impl Default for WorkerAccountChanges {
    fn default() -> Self {
        Self {
            photo: None,
            profession_id: None,
            first_name: None,
            last_name: None,
            birthdate: None,
            phone: None,
            location: None,
            about: None,
            driving_license: None,
            last_update: Utc::now().naive_utc(),
        }
    }
}

impl WorkerAccount {
    /// Builds a new account for `user_id` from a set of changes
    ///
    /// ### Arguments
    ///
    /// * `user_id` - The owning user's id
    /// * `changes` - Values for the account's columns
    ///
    /// ### Returns
    ///
    /// `None` if any of profession, names, birthdate, phone or location is missing
    pub fn from_changes(user_id: String, changes: WorkerAccountChanges) -> Option<Self> {
        Some(Self {
            user_id,
            photo: changes.photo.flatten(),
            profession_id: changes.profession_id?,
            first_name: changes.first_name?,
            last_name: changes.last_name?,
            birthdate: changes.birthdate?,
            phone: changes.phone?,
            rating: 0,
            location: changes.location?,
            about: changes.about.unwrap_or_default(),
            verified_id: false,
            driving_license: changes.driving_license.unwrap_or(false),
            last_update: changes.last_update,
        })
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_photo(&self) -> Option<String> {
        self.photo.clone()
    }

    pub fn get_profession_id(&self) -> i32 {
        self.profession_id
    }

    pub fn get_first_name(&self) -> String {
        self.first_name.clone()
    }

    pub fn get_last_name(&self) -> String {
        self.last_name.clone()
    }

    pub fn get_birthdate(&self) -> NaiveDate {
        self.birthdate
    }

    pub fn get_phone(&self) -> String {
        self.phone.clone()
    }

    pub fn get_rating(&self) -> i32 {
        self.rating
    }

    pub fn get_location(&self) -> String {
        self.location.clone()
    }

    pub fn get_about(&self) -> String {
        self.about.clone()
    }

    pub fn get_verified_id(&self) -> bool {
        self.verified_id
    }

    pub fn get_driving_license(&self) -> bool {
        self.driving_license
    }

    pub fn get_last_update(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.last_update, Utc)
    }
}
