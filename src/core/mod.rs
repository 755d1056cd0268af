pub mod aoe;
pub mod blocks;
pub mod channel;
pub mod cursor;
pub mod engine;
pub mod sanitize;
pub mod scanner;
