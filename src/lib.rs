pub mod api;
pub mod app;
pub mod calc;
pub mod clock;
pub mod err;
pub mod idle;
pub mod init;
