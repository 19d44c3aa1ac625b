//! Domain models, shared types, and error definitions.
//!
//! Foundation crate -- no async or I/O dependencies.

pub mod analytics;
pub mod error;
pub mod types;

pub use error::{
    ApiError, ErrorDetail, SignalsError, SignalsResult, StructuredDetail, TransportError,
};
pub use types::{
    ConversationDetail, ConversationStatus, Member, Message, OrgRole, Organization, User,
};
