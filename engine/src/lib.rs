pub mod assistant;
pub mod config;
pub mod debounce;
pub mod editor;
pub mod reconcile;
pub mod registry;
pub mod store;
pub mod summary;

#[cfg(test)]
pub(crate) mod testutil;
