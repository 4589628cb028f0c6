pub mod errors;
pub mod images;
