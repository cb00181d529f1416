pub mod addresses;
pub mod meta_address;
pub mod serve;
