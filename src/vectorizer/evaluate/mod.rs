pub mod keyword;
pub mod scoring;
