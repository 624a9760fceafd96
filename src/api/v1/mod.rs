//! Catalog pages: home, add form, list/search and detail.

pub mod home;
pub mod routes;
pub mod videos;
