mod dummy_transform_store;

pub use dummy_transform_store::*;
