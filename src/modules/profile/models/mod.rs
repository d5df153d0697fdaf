pub mod business_profile;

pub use business_profile::{BusinessProfile, BusinessProfileRequest};
