//! Authentication adapters.
//!
//! - `JwtSessionValidator` - HS256 bearer tokens (production)
//! - `MockSessionValidator` - Fixed token table (tests)

mod jwt;
mod mock;

pub use jwt::{Claims, JwtSessionValidator};
pub use mock::MockSessionValidator;
