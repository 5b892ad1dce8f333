use std::marker::PhantomData;

use fallible_streaming_iterator::FallibleStreamingIterator;

use super::{DbnMetadata, DecodeRecord};
use crate::{Error, HasRType, Result};

/// A consuming iterator wrapping a [`DecodeRecord`]. Lazily decodes the contents of
/// the file or other input stream.
///
/// Implements [`FallibleStreamingIterator`].
pub struct StreamIterDecoder<D, T> {
    /// The underlying decoder implementation.
    decoder: D,
    /// The most recently decoded record, if any. `None` both before the first
    /// `advance()` and once the stream is exhausted.
    item: Option<T>,
    /// Required to associate this type with a specific record type `T`.
    _marker: PhantomData<T>,
}

impl<D, T> StreamIterDecoder<D, T>
where
    T: HasRType,
{
    /// Creates a new streaming decoder using the given `decoder`.
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            item: None,
            _marker: PhantomData,
        }
    }
}

impl<D, T> FallibleStreamingIterator for StreamIterDecoder<D, T>
where
    D: DecodeRecord,
    T: HasRType + Clone,
{
    type Error = Error;
    type Item = T;

    fn advance(&mut self) -> Result<()> {
        self.item = self.decoder.decode_record::<T>()?.cloned();
        Ok(())
    }

    fn get(&self) -> Option<&Self::Item> {
        self.item.as_ref()
    }
}

impl<D, T> DbnMetadata for StreamIterDecoder<D, T>
where
    D: DbnMetadata,
{
    fn metadata(&self) -> &crate::Metadata {
        self.decoder.metadata()
    }

    fn metadata_mut(&mut self) -> &mut crate::Metadata {
        self.decoder.metadata_mut()
    }
}
