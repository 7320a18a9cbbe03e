mod transform_store;

pub use transform_store::*;
