use scene::{Feature, FeatureKey, Orthographic, World};

use crate::highlight::HighlightFrame;
use crate::path::{ScreenRing, project_features};
use crate::symbology::{FillStyle, Palette, Rgb};

/// Fillable outline in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// The whole globe.
    Disc { center: [f64; 2], radius: f64 },
    Rings(Vec<ScreenRing>),
}

/// 2D drawing target.
pub trait Surface {
    fn clear(&mut self);
    fn fill(&mut self, shape: &Shape, style: FillStyle);
}

/// Text element naming the hovered country.
pub trait Label {
    fn set_text(&mut self, text: &str);
    fn set_color(&mut self, color: Rgb);
}

/// Everything a frame reads.
#[derive(Debug, Copy, Clone)]
pub struct View<'a> {
    pub projection: &'a Orthographic,
    pub world: &'a World,
    pub palette: &'a Palette,
    pub hovered: Option<FeatureKey>,
    pub pinned: Option<FeatureKey>,
}

impl View<'_> {
    pub fn sphere(&self) -> Shape {
        Shape::Disc {
            center: self.projection.translate(),
            radius: self.projection.scale(),
        }
    }

    pub fn feature_shape<'f>(&self, features: impl IntoIterator<Item = &'f Feature>) -> Shape {
        Shape::Rings(project_features(self.projection, features))
    }

    fn country_shape(&self, key: FeatureKey) -> Option<Shape> {
        self.world
            .country(key)
            .map(|f| self.feature_shape(std::iter::once(f)))
    }
}

/// Draws background, land, the pinned country, then the hovered country.
pub fn render(view: &View<'_>, surface: &mut dyn Surface, label: &mut dyn Label) {
    let palette = view.palette;
    surface.clear();
    surface.fill(&view.sphere(), FillStyle::opaque(palette.water));
    surface.fill(
        &view.feature_shape(view.world.land()),
        FillStyle::opaque(palette.land),
    );

    if let Some(pinned) = view.pinned {
        label.set_color(palette.pinned);
        if let Some(shape) = view.country_shape(pinned) {
            surface.fill(&shape, FillStyle::opaque(palette.pinned));
        }
    }

    if let Some(hovered) = view.hovered.filter(|&h| Some(h) != view.pinned) {
        label.set_color(palette.label_hover);
        if let Some(shape) = view.country_shape(hovered) {
            surface.fill(&shape, FillStyle::opaque(palette.hover));
        }
    }
}

/// Overlays one highlight frame on an already rendered scene.
pub fn draw_highlight(view: &View<'_>, surface: &mut dyn Surface, frame: &HighlightFrame) {
    if let Some(shape) = view.country_shape(frame.feature) {
        surface.fill(&shape, frame.style);
    }
}
