//! Blog content pipeline for the Social Bloom site.
//!
//! Posts are fetched from DatoCMS, filtered to the published ones, and
//! normalized into [`post::Post`] records whose structured-text body is
//! rendered to HTML, Markdown or plain text.
pub mod api;
pub mod config;
pub mod datocms;
pub mod error;
pub mod post;
pub mod richtext;

mod utils;
