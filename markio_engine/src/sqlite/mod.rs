//! SQLite backend for the Markio engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
