pub mod collection_id;
pub mod descriptor;
pub mod property;
pub mod store;

pub use collection_id::CollectionId;
pub use descriptor::Descriptor;
pub use property::{Property, PropertySpec};
pub use store::DescriptorStore;
