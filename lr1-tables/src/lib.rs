mod conflict;
mod table;

pub use conflict::Conflict;
pub use table::{generate_table, Action, ActionGotoTable, TableError};
