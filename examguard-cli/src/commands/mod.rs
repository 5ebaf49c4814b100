pub mod check_key;
pub mod config;
pub mod countdown;
pub mod replay;
