pub mod registry;

pub use registry::{GenreRegistry, IdAllocation, NOT_FOUND_MESSAGE};
