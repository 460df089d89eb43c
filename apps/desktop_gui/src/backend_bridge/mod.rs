//! Backend bridge: command queue from the UI thread to the I/O worker.

pub mod commands;
pub mod runtime;
