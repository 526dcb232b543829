pub mod credentials;
pub mod email;
pub mod password;
pub mod session;
pub mod user;
