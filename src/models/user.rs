use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

/// A registered user of the marketplace
///
/// Worker and employer profiles hang off a user through `user_id`; the
/// `has_worker_account` / `has_employer_account` flags mirror whether those
/// profiles exist.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    /// Unique identifier for the user (UUID v4 as string)
    id: String,

    /// Unique login name
    username: String,

    /// Unique email address
    email: String,

    /// Salted password hash, see `auth::hash_password`
    #[serde(skip_serializing)]
    password_hash: String,

    first_name: String,
    last_name: String,
    birthdate: Option<NaiveDate>,
    phone: String,
    verified_id: bool,
    has_worker_account: bool,
    has_employer_account: bool,

    /// Staff users may delete jobs and read contracts they are not part of
    is_staff: bool,

    date_joined: NaiveDateTime,
}

impl User {
    /// Creates a new user with no profile data
    ///
    /// ### Arguments
    ///
    /// * `username` - The login name
    /// * `email` - The email address
    /// * `password_hash` - An already hashed password
    ///
    /// ### Returns
    ///
    /// A new `User` with a fresh UUID and `date_joined` set to now
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            first_name: String::new(),
            last_name: String::new(),
            birthdate: None,
            phone: String::new(),
            verified_id: false,
            has_worker_account: false,
            has_employer_account: false,
            is_staff: false,
            date_joined: Utc::now().naive_utc(),
        }
    }

    /// Marks the user as staff
    pub fn with_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_username(&self) -> String {
        self.username.clone()
    }

    pub fn get_email(&self) -> String {
        self.email.clone()
    }

    pub fn get_password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn get_first_name(&self) -> String {
        self.first_name.clone()
    }

    pub fn get_last_name(&self) -> String {
        self.last_name.clone()
    }

    pub fn get_birthdate(&self) -> Option<NaiveDate> {
        self.birthdate
    }

    pub fn get_phone(&self) -> String {
        self.phone.clone()
    }

    pub fn get_verified_id(&self) -> bool {
        self.verified_id
    }

    pub fn get_has_worker_account(&self) -> bool {
        self.has_worker_account
    }

    pub fn get_has_employer_account(&self) -> bool {
        self.has_employer_account
    }

    pub fn get_is_staff(&self) -> bool {
        self.is_staff
    }

    /// Gets the date the user registered
    ///
    /// ### Returns
    ///
    /// The registration timestamp as a DateTime<Utc>
    pub fn get_date_joined(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.date_joined, Utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new() {
        let user = User::new("john".to_string(), "john@example.com".to_string(), "hash".to_string());

        assert!(Uuid::parse_str(&user.get_id()).is_ok());
        assert_eq!(user.get_username(), "john");
        assert_eq!(user.get_email(), "john@example.com");
        assert_eq!(user.get_password_hash(), "hash");
        assert!(!user.get_has_worker_account());
        assert!(!user.get_has_employer_account());
        assert!(!user.get_is_staff());
        assert!(user.get_birthdate().is_none());

        let diff = Utc::now().signed_duration_since(user.get_date_joined());
        assert!(diff.num_seconds() < 1);
    }

    #[test]
    fn test_user_with_staff() {
        let user = User::new("admin".to_string(), "admin@example.com".to_string(), "hash".to_string())
            .with_staff(true);
        assert!(user.get_is_staff());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("john".to_string(), "john@example.com".to_string(), "secret".to_string());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "john");
    }
}
