pub mod render_settings;

pub use render_settings::RenderSettings;
