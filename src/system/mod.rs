pub mod aggregate;
pub mod collector;
pub mod cwd;
pub mod identify;
pub mod lifecycle;
pub mod process;
pub mod signal;
pub mod snapshot;
pub mod source;
pub mod tree;
