pub mod access;
pub mod error;
pub mod feature_flags;
pub mod guard;
pub mod models;
pub mod reports;

pub use access::*;
pub use error::*;
pub use feature_flags::*;
pub use guard::*;
pub use models::*;
pub use reports::*;
