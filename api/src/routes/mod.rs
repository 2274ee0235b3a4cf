pub mod chat;
pub mod index_page_route;
