mod stream;

pub use stream::EventStream;
pub use stream::Subscription;
