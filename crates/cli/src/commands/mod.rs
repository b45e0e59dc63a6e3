pub mod config;
pub mod device;
pub mod images;
pub mod status;
