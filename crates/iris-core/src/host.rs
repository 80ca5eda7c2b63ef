// File: crates/iris-core/src/host.rs
// Summary: Host embedding seam: the node a plot draws into and the JSON data component that drives it.

use serde::Deserialize;
use serde_json::Value;

use crate::error::PlotError;
use crate::layout::LayoutOptions;
use crate::plot::AnnotatedPlot;
use crate::series::Series;
use crate::types::CursorStyle;

/// The element hosting a plot. It receives the scoped stylesheet, its size and the
/// cursor affordance of the interactive layer.
pub trait HostNode {
    fn apply_stylesheet(&mut self, css: &str);
    fn resize(&mut self, width: u32, height: u32);
    fn set_cursor(&mut self, _cursor: CursorStyle) {}
}

/// A host with no display; records what it was asked to do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadlessHost {
    pub stylesheet: String,
    pub size: (u32, u32),
    pub cursor: CursorStyle,
}

impl HostNode for HeadlessHost {
    fn apply_stylesheet(&mut self, css: &str) {
        self.stylesheet = css.to_string();
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }
}

/// The `{ "series": [...], "layout": {...} }` object a host hands over.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct HostData {
    pub series: Vec<Series>,
    pub layout: LayoutOptions,
}

impl HostData {
    pub fn from_value(value: &Value) -> Result<Self, PlotError> {
        Ok(Self::deserialize(value)?)
    }

    pub fn from_json(s: &str) -> Result<Self, PlotError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Binds a host's `Data` object to an [`AnnotatedPlot`]: built on setup, updated on every
/// data change, with the rendered height written back under `"Height"`.
pub struct PlotComponent<H: HostNode> {
    plot: AnnotatedPlot<H>,
    data: Value,
}

impl<H: HostNode> PlotComponent<H> {
    pub fn setup(host: H, data: Value) -> Result<Self, PlotError> {
        let parsed = HostData::from_value(&data)?;
        let plot = AnnotatedPlot::new(&parsed.series, host, &parsed.layout)?;
        let mut component = Self { plot, data };
        component.write_height();
        Ok(component)
    }

    /// Re-read `data` and update the plot. A malformed payload leaves the plot as it was.
    pub fn on_data_changed(&mut self, data: Value) -> Result<(), PlotError> {
        let parsed = HostData::from_value(&data)?;
        self.plot.update(&parsed.series, Some(&parsed.layout))?;
        self.data = data;
        self.write_height();
        Ok(())
    }

    fn write_height(&mut self) {
        let height = self.plot.layout().height;
        match self.data.as_object_mut() {
            Some(obj) => {
                obj.insert("Height".to_string(), Value::from(height));
            }
            None => tracing::warn!("host data is not an object; height not reported"),
        }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn plot(&self) -> &AnnotatedPlot<H> {
        &self.plot
    }

    pub fn plot_mut(&mut self) -> &mut AnnotatedPlot<H> {
        &mut self.plot
    }
}
