pub mod cache;
pub mod city_info;
pub mod collect;
pub mod commons;
pub mod error;
pub mod geo_core;
pub mod geometric;
pub mod viewer;
