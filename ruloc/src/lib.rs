mod clients;
mod error;
mod resolver;
mod state;
mod traits;
mod utils;

pub use clients::*;
pub use error::*;
pub use resolver::*;
pub use state::*;
pub use traits::*;
pub use utils::*;

// re-export
pub use nalgebra::Isometry3;
