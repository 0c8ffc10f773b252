pub mod commands;
pub mod keg;
pub mod publish;
pub mod runtime;
pub mod shell;
