pub mod browser;

pub use browser::{BrowserMessage, BrowserStats, RepositoryBrowser};
