//! Bookshelf Application Library
//!
//! Project modules for the bookshelf service.

pub mod modules;
