mod effects;
mod render;
mod session;
mod settings;

pub use effects::{Deferred, EffectReport, EffectRunner};
pub use render::{render, EMPTY_STATE_TEXT};
pub use session::Session;
pub use settings::{load_config, read_config, render_config, ConfigError};
