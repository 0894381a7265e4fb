mod renderer;
pub mod view_models;

pub use renderer::ConsoleRenderer;
