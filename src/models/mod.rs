pub mod artifact;
pub mod block;
pub mod enums;
pub mod record;
pub mod template;

pub use artifact::*;
pub use block::*;
pub use enums::*;
pub use record::*;
pub use template::*;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
