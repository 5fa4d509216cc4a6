#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod controller;
pub mod document;
pub mod error;
pub mod geometry;
pub mod id_source;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod shape;

pub use app::InkboardApp;
pub use controller::{CanvasController, Tool};
pub use document::Document;
pub use error::{DocumentError, ShapeError};
pub use geometry::Transform;
pub use id_source::{IdSource, SequentialIdSource, UuidSource};
pub use shape::{DrawnShape, ShapeKind, StrokeConfig, StrokeStyle};
