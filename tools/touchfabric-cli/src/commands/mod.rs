pub mod area;
pub mod config;
pub mod listen;
pub mod run;
pub mod simulate;
