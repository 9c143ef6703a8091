use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use diesel::prelude::*;
use rand::Rng;

/// How long a login session stays valid
pub const SESSION_LIFETIME_DAYS: i64 = 14;

/// A login session identified by an opaque random token
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Session {
    /// 64 hex characters of random data
    token: String,
    user_id: String,
    created_at: NaiveDateTime,
    expires_at: NaiveDateTime,
}

impl Session {
    /// Creates a session for `user_id` expiring after `SESSION_LIFETIME_DAYS`
    pub fn new(user_id: String) -> Self {
        let mut bytes = [0u8; 32];
        rand::rng().fill(&mut bytes);

        let now = Utc::now().naive_utc();
        Self {
            token: hex::encode(bytes),
            user_id,
            created_at: now,
            expires_at: now + Duration::days(SESSION_LIFETIME_DAYS),
        }
    }

    pub fn get_token(&self) -> String {
        self.token.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    pub fn get_expires_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.expires_at, Utc)
    }

    /// Returns true once `now` has passed the expiry time
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.get_expires_at()
    }
}
