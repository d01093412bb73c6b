// Library root: domain records, configuration and the data-source seam
// shared by the optimization engine and the command-line front end.

pub mod config;
pub mod fpl;
pub mod source;
