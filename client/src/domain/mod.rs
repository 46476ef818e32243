//! Domain primitives and ports.
//!
//! Purpose: define the strongly typed entities mirrored from the review
//! service (users, manual sections, feedback entries), the validated review
//! form, the session state machine, and the ports the application layer
//! drives. Types are immutable snapshots of server state; invariants and
//! serialisation contracts (serde) live in each type's Rustdoc.

pub mod auth;
pub mod manual;
pub mod ports;
pub mod review;
pub mod session;
pub mod user;

pub use self::auth::{AccessToken, CredentialValidationError, LoginOutcome, LoginRequest};
pub use self::manual::{
    Entry, EntryAuthor, EntryId, EntryKind, ManualSection, ManualValidationError, SectionEntries,
    SectionId,
};
pub use self::review::{ActionChoice, ReviewFields, ReviewForm, ReviewFormValidationError};
pub use self::session::{Session, SessionCredentials, SessionStatus};
pub use self::user::{Role, ServiceNumber, User, UserId, UserValidationError};
