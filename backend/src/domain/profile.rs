//! Per-user public profile.

use chrono::{DateTime, Utc};

use super::ownership::Owned;
use super::{User, UserId, Username};

/// Profile owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub owner: User,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Profile {
    fn owner_id(&self) -> &UserId {
        self.owner.id()
    }
}

/// Changes applied to a profile. `None` leaves the bio untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub bio: Option<String>,
}

/// Bio written for a freshly provisioned profile.
///
/// # Examples
/// ```
/// use backend::domain::{default_bio, Username};
///
/// let name = Username::new("alice").unwrap();
/// assert_eq!(default_bio(&name), "This is alice's profile.");
/// ```
pub fn default_bio(username: &Username) -> String {
    format!("This is {username}'s profile.")
}
