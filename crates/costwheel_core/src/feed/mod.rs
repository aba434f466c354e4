//! Change feed: events, delivery channel, adapter and in-memory collaborator.

mod adapter;
mod channel;
mod collection;
mod event;

pub use adapter::FeedAdapter;
pub use channel::ChangeFeed;
pub use collection::{CollectionWriter, InMemoryCollection};
pub use event::{ChangeEvent, ChangeKind, FeedBatch};
