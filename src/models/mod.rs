pub mod collection;
pub mod entity;
pub mod profile;
pub mod expense;
pub mod vendor;
pub mod guest;
pub mod task;
pub mod inspiration;
pub mod response;

pub use collection::{Collection, ID_FIELD, OWNER_FIELD};
pub use entity::Entity;
pub use profile::Profile;
pub use expense::Expense;
pub use vendor::Vendor;
pub use guest::Guest;
pub use task::Task;
pub use inspiration::Inspiration;
pub use response::{NormalizedResponse, ResponseSource};
