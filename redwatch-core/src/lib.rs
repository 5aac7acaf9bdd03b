pub mod error;
pub mod matcher;
pub mod notification;
pub mod source;
pub mod types;

pub use error::*;
pub use matcher::*;
pub use notification::*;
pub use source::*;
pub use types::*;
