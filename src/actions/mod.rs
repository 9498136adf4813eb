pub mod api_doc;
pub mod broadcast;
pub mod conda_forge;
pub mod create;
pub mod local;
pub mod news;
