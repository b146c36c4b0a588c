use std::pin::Pin;

use futures::Stream;

/// A pinned, boxed stream that is required to be Send.
pub type BoxStreamSend<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;
