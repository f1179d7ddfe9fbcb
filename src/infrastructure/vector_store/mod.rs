mod builder;
mod flat;
mod index;
mod persist;

pub use builder::IndexBuilder;
pub use flat::FlatIndexStore;
pub use index::FlatL2Index;
pub use persist::{ArtifactState, IndexArtifacts, PersistedIndex};
