//! Countries module - country identity and the directory collaborator.

mod countries_constants;
mod countries_model;
mod countries_traits;

pub use countries_constants::{fallback_group_members, EU_NEIGHBOURS_GROUP_ID};
pub use countries_model::{Country, CountryId};
pub use countries_traits::CountryDirectoryTrait;
