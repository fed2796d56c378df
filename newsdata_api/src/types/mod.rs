mod article;
pub use self::article::{Article, Sentiment, SentimentStats};

mod lenient;

mod response;
pub use self::response::{ErrorDetail, NewsResponse, ResponseStatus, Results};
