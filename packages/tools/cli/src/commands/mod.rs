//! CLI 명령어 구현

pub mod locate;
pub mod reference;
pub mod render;
pub mod reveal;
pub mod schemas;
pub mod search;
pub mod tables;
