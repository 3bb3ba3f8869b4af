pub mod synthetic_profile;
