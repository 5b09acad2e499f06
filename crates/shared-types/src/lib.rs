pub mod error;
pub mod facets;
pub mod filter_router;
pub mod outcome;
pub mod search_params;

pub use error::*;
pub use facets::*;
pub use filter_router::*;
pub use outcome::*;
pub use search_params::*;
