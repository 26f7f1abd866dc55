pub mod app;
pub mod monitor;
pub mod serial;
pub mod telemetry;
pub mod ui;
