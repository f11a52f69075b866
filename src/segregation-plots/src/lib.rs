#![doc = include_str!("../../../README.MD")]

pub mod config;
pub mod histogram;
pub mod indices;
pub mod pages;
pub mod pdf;
pub mod plot;
pub mod region;
pub mod report;
pub mod selection;
pub mod summary;
