pub mod check_config;
pub mod init;
pub mod languages;
pub mod serve;
