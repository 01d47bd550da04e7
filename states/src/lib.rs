//! Observable state for the stash front-end.
//!
//! A [`Store`] owns one state value. Every [`Store::update`] is applied under
//! the store's lock and published once to all live [`Subscription`]s, so a
//! reader never sees a half-applied change.

mod error;
mod store;
mod subscription;

pub use error::Error;
pub use store::Store;
pub use subscription::Subscription;
