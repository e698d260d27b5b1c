pub mod archive;
pub mod compare;
pub mod config;
pub mod report;
pub mod run;
pub mod validator;

pub mod error;
