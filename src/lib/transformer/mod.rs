//! A transformer is an adapter over an iterator of pulldown-cmark `Event`.
//! It intercepts any incoming event(s) that are of interest, and outputs a
//! transformed event. The code-block transformer, for example, consumes the
//! sequence of events between `Event::Start(Tag::CodeBlock(lang))` and
//! `Event::End(TagEnd::CodeBlock)` and returns a single highlighted
//! `Event::Html` in their place.
use pulldown_cmark::Event;

pub mod code_block;
pub mod figure;

/// A transformer over events, that takes in an inner iterator and returns
/// another iterator of events, which returns transformed events.
pub trait Transformer<'a, I>: Iterator<Item = Event<'a>> + Sized
where
    I: Iterator<Item = Event<'a>>,
{
    /// Wrap an inner iterator with the transformer
    fn transform(inner: I) -> Self;
}

/// Wrap an event iterator with another transformer, allowing for chaining.
pub trait WithTransformer<'a>: Iterator<Item = Event<'a>> + Sized {
    /// Wrap ourselves with some transformer
    fn with_transformer<T: Transformer<'a, Self>>(self) -> T {
        T::transform(self)
    }
}

/// Blanket implementation over any event iterator
impl<'a, I: Iterator<Item = Event<'a>>> WithTransformer<'a> for I {}
