//! Domain types shared across SecurePaste.
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, SecurePasteError>`]:
//!
//! ```rust
//! use securepaste::domain::{Result, SecurePasteError, ValidationError};
//!
//! fn example(valid: bool) -> Result<()> {
//!     if !valid {
//!         return Err(ValidationError::MissingEntities.into());
//!     }
//!     Ok(())
//! }
//!
//! let err = example(false).unwrap_err();
//! assert!(matches!(err, SecurePasteError::Configuration(_)));
//! ```

pub mod errors;
pub mod result;

pub use errors::{SecurePasteError, ValidationError};
pub use result::Result;
