pub mod catalog;
pub mod clock;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod language;
pub mod lookup;
pub mod preprocess;
pub mod search;
pub mod source;
pub mod storage;
pub mod suggest;

#[cfg(test)]
pub(crate) mod testing;
