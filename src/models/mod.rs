//! Data models

pub mod book;
pub mod fine;
pub mod issue;
pub mod membership;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use fine::{Fine, FineDetails};
pub use issue::{IssuedBook, OpenIssue, ReturnReceipt};
pub use membership::Membership;
pub use user::{Role, User, UserClaims};
