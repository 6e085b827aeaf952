//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI args
//! and executes the operation against the database.

pub mod check;
pub mod init;
pub mod list;
pub mod show;
pub mod tag;

// Re-export execute functions for convenience
pub use check::execute as check;
pub use init::execute as init;
pub use list::execute as list;
pub use show::execute as show;
pub use tag::execute as tag;
