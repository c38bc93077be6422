pub mod password;
pub mod jwt;
pub mod flash;
pub mod gravatar;
