pub mod collection;
pub mod error;
pub mod figure;
pub mod key;
pub mod set;

// Re-export commonly used types
pub use collection::{ChangeLog, Collection};
pub use error::CoreError;
pub use figure::Figure;
pub use key::SetKey;
pub use set::Set;
