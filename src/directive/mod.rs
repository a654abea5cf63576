//! Chart directives: the typed contract handed to the renderer, and the
//! validator that builds it from raw payload text.

pub mod palette;
pub mod rejection;
pub mod types;
pub mod validator;

pub use palette::{Palette, DEFAULT_COLORS};
pub use rejection::Rejection;
pub use types::{CartesianAxes, ChartDirective, ChartSpec, ChartType, DataRecord, PieAxes, Scalar};
pub use validator::DirectiveValidator;
