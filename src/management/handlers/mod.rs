//! # API 处理器模块

pub mod networks;
pub mod people;
