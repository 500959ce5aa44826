// floe/src/commands/mod.rs
//
// Each command returns whether the run passed; main turns `false` into exit code 1.

pub mod merge;
pub mod score;
pub mod validate;
