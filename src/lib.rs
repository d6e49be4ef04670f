pub mod attachment;
pub mod cli;
pub mod collections;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod handler;
pub mod navigation;
pub mod pages;
pub mod resume;
pub mod search;
pub mod storage;
pub mod store;
pub mod types;
pub mod workspace;

pub mod metadata {
    include!(concat!(env!("OUT_DIR"), "/pkg_info.rs"));
}
