pub mod providers;
pub mod sanitize;
pub mod telegram;
pub mod universe;
pub mod yahoo;

pub use providers::{MarketCapProvider, NotificationSink, PriceHistoryProvider, UniverseProvider};
pub use telegram::TelegramClient;
pub use universe::UniverseClient;
pub use yahoo::YahooClient;
