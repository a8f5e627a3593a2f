//! Owner-based write authorization.
//!
//! Every ownable entity records exactly one owner at creation. Any
//! authenticated principal may read it; only the owner may change or remove
//! it. [`authorize_write`] is the pure predicate, [`ensure_permitted`] turns
//! its verdict into a domain error for services.

use super::{Error, UserId};

/// Entity with a single immutable owner.
pub trait Owned {
    /// Identifier of the principal that created the entity.
    fn owner_id(&self) -> &UserId;
}

/// Operation a principal wants to perform on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Retrieve,
    List,
    Update,
    PartialUpdate,
    Delete,
}

impl Action {
    /// Whether the action changes persisted state.
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Update | Self::PartialUpdate | Self::Delete)
    }
}

/// Outcome of the ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Decide whether `principal` may perform `action` on `entity`.
///
/// # Examples
/// ```
/// use backend::domain::ownership::{authorize_write, Action, Decision, Owned};
/// use backend::domain::UserId;
///
/// struct Note(UserId);
/// impl Owned for Note {
///     fn owner_id(&self) -> &UserId {
///         &self.0
///     }
/// }
///
/// let alice = UserId::random();
/// let bob = UserId::random();
/// let note = Note(alice);
/// assert_eq!(authorize_write(&alice, &note, Action::Delete), Decision::Allow);
/// assert_eq!(authorize_write(&bob, &note, Action::Delete), Decision::Deny);
/// assert_eq!(authorize_write(&bob, &note, Action::Retrieve), Decision::Allow);
/// ```
pub fn authorize_write<E>(principal: &UserId, entity: &E, action: Action) -> Decision
where
    E: Owned + ?Sized,
{
    if !action.is_mutating() || entity.owner_id() == principal {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Apply [`authorize_write`] and report a missing principal or a deny.
///
/// `noun` names the entity in the error message (for example `"post"`).
pub fn ensure_permitted<E>(
    principal: Option<&UserId>,
    entity: &E,
    action: Action,
    noun: &str,
) -> Result<(), Error>
where
    E: Owned + ?Sized,
{
    let principal = principal.ok_or_else(|| Error::unauthorized("login required"))?;
    match authorize_write(principal, entity, action) {
        Decision::Allow => Ok(()),
        Decision::Deny => Err(Error::forbidden(format!(
            "only the owner may modify this {noun}"
        ))),
    }
}
