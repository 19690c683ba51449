//! HTTP-based acquisition of the source table.
//!
//! Fetches the source page over plain HTTP (no browser rendering — the
//! table is static HTML) and parses the target wikitable with CSS
//! selector-based extraction.

pub mod http_client;
pub mod wikitable;
