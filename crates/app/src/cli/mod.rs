pub mod args;
pub mod op;
pub mod ops;
pub mod prompt;

pub use ops::{Cascade, Delete, Init, List, Login, Logout, Show, Version, Whoami};
