pub mod file;

pub use file::FileCookieJar;
