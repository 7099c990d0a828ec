mod cache;
mod common;
mod explanation;
mod search;
mod service;
