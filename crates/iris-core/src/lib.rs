// File: crates/iris-core/src/lib.rs
// Summary: Core library entry point; exports the public API for building, drawing and interacting with plots.

pub mod animation;
pub mod axis;
pub mod binder;
pub mod container;
pub mod curve;
pub mod error;
pub mod geometry;
pub mod host;
pub mod interaction;
pub mod layout;
pub mod plot;
pub mod render;
pub mod scale;
pub mod series;
pub mod symbol;
pub mod text;
pub mod theme;
pub mod tooltip;
pub mod types;
pub mod view;

pub use binder::{BindDiff, DataBinder};
pub use container::Container;
pub use error::{BindError, LayoutError, PlotError, RenderError, ScaleDomainError};
pub use geometry::Point;
pub use host::{HeadlessHost, HostData, HostNode, PlotComponent};
pub use interaction::{InteractionController, WheelMode};
pub use layout::{AxisOptions, FontOptions, Layout, LayoutOptions};
pub use plot::{AnnotatedPlot, Plot};
pub use render::{FrameScales, Renderer};
pub use scale::{ContinuousScale, ScaleKind};
pub use series::{LineStyle, MarkerStyle, Mode, Series, StrokeStyle, Symbol};
pub use text::TextShaper;
pub use theme::Theme;
pub use tooltip::{TooltipEngine, TooltipEntry};
pub use types::{CursorStyle, Insets};
pub use view::ViewTransform;
