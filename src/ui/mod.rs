//! Terminal user interface: event loop, painting, and styles.

pub mod app;
pub mod styles;
pub mod view;

pub use app::App;
