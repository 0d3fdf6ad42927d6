// saftq/src/commands/mod.rs

pub mod check;
pub mod inspect;
pub mod run;
