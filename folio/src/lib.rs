pub mod commands;
pub mod environment;
pub mod relay;
pub mod storage;
pub mod ui;
