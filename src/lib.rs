// Inkan watermarking pipeline library

pub mod codec;
pub mod config;
pub mod error;
pub mod handler;
pub mod logging;
pub mod pipeline;
pub mod storage;
pub mod watermark;
