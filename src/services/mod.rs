//! External collaborator interfaces and their HTTP implementations.

pub mod alphavantage;
pub mod market_data;
pub mod news;

pub use alphavantage::AlphaVantageClient;
pub use market_data::{Interval, MarketDataError, MarketDataProvider};
pub use news::{Article, NewsError, NewsProvider, NewsdataClient};
