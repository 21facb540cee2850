pub mod logger;
pub mod error;
pub mod config;
pub mod convert;
pub mod interp;
pub mod cache;
pub mod contrast;
pub mod cvd;
pub mod harmony;
pub mod ramp;
pub mod scale;
pub mod semantic;
pub mod mix;
pub mod names;

pub use config::EngineConfig;
pub use convert::{Hsl, Hsv, Lab, Rgb};
pub use cvd::{CvdSimulator, CvdType};
pub use error::{ColorError, Result};
pub use harmony::{HarmonyAnalysis, HarmonyOptions, HarmonyType};
pub use interp::{Curve, HuePath};
pub use scale::{ColorScale, ScaleCategory, ThemeMode};
