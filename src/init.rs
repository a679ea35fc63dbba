pub mod logging;
pub mod settings;
pub mod setup;
pub mod shutdown;
