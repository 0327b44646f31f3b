#![warn(clippy::all, rust_2018_idioms)]

pub mod chunk;
pub mod controller;
pub mod error;
pub mod event;
pub mod geometry;
pub mod model;
pub mod paint;
pub mod slicer;
pub mod store;
pub mod types;

pub use controller::ViewerController;
pub use error::{NdviewError, Result};
pub use model::{DataManager, SceneManager, ViewerModel};
