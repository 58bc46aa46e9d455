mod convert;
mod value;

pub use convert::FromClaimValue;
pub use value::ClaimValue;
