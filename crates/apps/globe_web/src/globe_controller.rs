//! Globe interaction: drag rotation, auto-rotation, hover picking and the
//! highlight fade, over any [`Surface`] and [`Label`].
//!
//! Event handlers mutate the controller directly and redraw where the page
//! expects immediate feedback; `frame` is called once per animation frame.

use foundation::time::Millis;
use formats::LoadedWorld;
use layers::highlight::HighlightAnimator;
use layers::{Label, Palette, Surface, View, draw_highlight, render};
use runtime::{EventBus, Frame};
use scene::autorotate::AutoRotate;
use scene::picking::pick_screen;
use scene::{FeatureKey, HoverTransition, Orthographic, SceneState};
use tracing::debug;

use crate::config::GlobeConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum GlobeEvent {
    Enter { feature: FeatureKey, name: String },
    Leave { feature: FeatureKey },
    DragStart,
    DragEnd,
}

pub struct GlobeController<S, L> {
    projection: Orthographic,
    state: SceneState,
    loaded: LoadedWorld,
    palette: Palette,
    autorotate: AutoRotate,
    animator: HighlightAnimator,
    events: EventBus<GlobeEvent>,
    frame: Frame,
    drag_sensitivity: f64,
    rotation_delay_ms: f64,
    surface: S,
    label: L,
}

impl<S: Surface, L: Label> GlobeController<S, L> {
    /// Builds the controller with auto-rotation running from `now`.
    pub fn new(config: &GlobeConfig, loaded: LoadedWorld, surface: S, label: L, now: Millis) -> Self {
        let palette = config.palette();
        let mut projection = Orthographic::new();
        projection.set_rotation(config.angles.into());
        let state = SceneState::new(projection.rotation(), loaded.pinned);
        let mut autorotate = AutoRotate::new(config.deg_per_sec, config.frame_budget_ms, now);
        autorotate.start(now);

        Self {
            projection,
            state,
            loaded,
            palette,
            autorotate,
            animator: HighlightAnimator::new(
                config.animation_duration_ms,
                palette.land,
                palette.highlight,
            ),
            events: EventBus::new(),
            frame: Frame::new(0, now),
            drag_sensitivity: config.drag_sensitivity,
            rotation_delay_ms: config.rotation_delay_ms,
            surface,
            label,
        }
    }

    pub fn projection(&self) -> &Orthographic {
        &self.projection
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn loaded(&self) -> &LoadedWorld {
        &self.loaded
    }

    pub fn animator(&self) -> &HighlightAnimator {
        &self.animator
    }

    pub fn events(&self) -> &EventBus<GlobeEvent> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus<GlobeEvent> {
        &mut self.events
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn label(&self) -> &L {
        &self.label
    }

    pub fn is_rotating(&self) -> bool {
        self.autorotate.is_running()
    }

    /// Fits the globe to a new surface size and redraws.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.projection.scale_to(width, height);
        self.render();
    }

    pub fn on_drag_start(&mut self, at: [f64; 2]) {
        self.state.begin_drag(at);
        self.autorotate.stop();
        self.events.emit(self.frame, GlobeEvent::DragStart);
        debug!(x = at[0], y = at[1], "drag started");
    }

    /// Rotates by the pointer delta; ignored unless dragging.
    pub fn on_drag(&mut self, at: [f64; 2]) -> bool {
        if self.state.drag_to(at, self.drag_sensitivity).is_none() {
            return false;
        }
        self.sync_rotation();
        self.render();
        true
    }

    pub fn on_drag_end(&mut self, now: Millis) {
        if !self.state.end_drag() {
            return;
        }
        self.autorotate.restart(now, self.rotation_delay_ms);
        self.events.emit(self.frame, GlobeEvent::DragEnd);
        debug!(delay_ms = self.rotation_delay_ms, "drag ended");
    }

    /// Hover picking: leave the previous country, then enter the new one.
    pub fn on_pointer_move(&mut self, at: [f64; 2], now: Millis) {
        let hit = pick_screen(&self.loaded.world, &self.projection, at);
        let HoverTransition::Changed { left, entered } = self.state.set_hovered(hit) else {
            return;
        };
        if let Some(feature) = left {
            self.leave(feature);
        }
        self.render();
        if let Some(feature) = entered {
            self.enter(feature, now);
        }
    }

    /// Advances auto-rotation and highlights. Returns whether anything was drawn.
    pub fn frame(&mut self, now: Millis) -> bool {
        self.frame = self.frame.next(now);
        let rotated = self.autorotate.tick(now, &mut self.state.rotation);
        if rotated {
            self.sync_rotation();
        }
        let highlights = self.animator.tick(now);
        if !rotated && highlights.is_empty() {
            return false;
        }
        self.render();
        let view = scene_view(&self.projection, &self.loaded, &self.palette, &self.state);
        for h in &highlights {
            draw_highlight(&view, &mut self.surface, h);
        }
        true
    }

    /// Redraws the base scene.
    pub fn render(&mut self) {
        let view = scene_view(&self.projection, &self.loaded, &self.palette, &self.state);
        render(&view, &mut self.surface, &mut self.label);
    }

    // Keeps the scene rotation reduced the same way the projection stores it.
    fn sync_rotation(&mut self) {
        self.projection.set_rotation(self.state.rotation);
        self.state.rotation = self.projection.rotation();
    }

    fn enter(&mut self, feature: FeatureKey, now: Millis) {
        let name = self.loaded.display_name(feature).to_string();
        self.label.set_text(&name);
        self.animator.start(feature, now);
        debug!(feature = feature.index(), name = %name, "country entered");
        self.events.emit(self.frame, GlobeEvent::Enter { feature, name });
    }

    fn leave(&mut self, feature: FeatureKey) {
        self.label.set_text("");
        self.animator.cancel(feature);
        debug!(feature = feature.index(), "country left");
        self.events.emit(self.frame, GlobeEvent::Leave { feature });
    }
}

fn scene_view<'a>(
    projection: &'a Orthographic,
    loaded: &'a LoadedWorld,
    palette: &'a Palette,
    state: &SceneState,
) -> View<'a> {
    View {
        projection,
        world: &loaded.world,
        palette,
        hovered: state.hovered(),
        pinned: state.pinned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{GlobeController, GlobeEvent};
    use crate::canvas::PointerMapping;
    use crate::config::GlobeConfig;
    use foundation::math::LonLat;
    use foundation::time::Millis;
    use formats::{LoadOptions, load_world};
    use layers::display_list::{DisplayList, TextLabel};
    use layers::{FillStyle, Rgb};
    use pretty_assertions::assert_eq;
    use scene::{FeatureKey, Rotation};

    const TOPOLOGY: &str = include_str!("../assets/sample-world.topo.json");
    const NAMES: &str = include_str!("../assets/sample-country-names.tsv");

    type Controller = GlobeController<DisplayList, TextLabel>;

    fn controller() -> Controller {
        let config = GlobeConfig::default();
        let loaded = load_world(TOPOLOGY, NAMES, &LoadOptions::default()).expect("load");
        let mut c = GlobeController::new(
            &config,
            loaded,
            DisplayList::default(),
            TextLabel::default(),
            Millis(0.0),
        );
        c.resize(800.0, 600.0);
        c
    }

    fn screen_of(c: &Controller, lon: f64, lat: f64) -> [f64; 2] {
        c.projection()
            .project(LonLat::new(lon, lat))
            .expect("point faces the viewer")
    }

    #[test]
    fn drag_rotates_by_scaled_delta() {
        let mut c = controller();
        c.on_drag_start([100.0, 100.0]);
        assert!(!c.is_rotating());
        assert!(c.on_drag([140.0, 84.0]));
        assert_eq!(c.state().rotation, Rotation::new(-90.0, -16.0, 0.0));
        assert_eq!(c.projection().rotation(), Rotation::new(-90.0, -16.0, 0.0));

        c.on_drag_end(Millis(50.0));
        assert!(c.is_rotating());
        assert!(!c.on_drag([200.0, 200.0]));
        assert_eq!(c.state().rotation, Rotation::new(-90.0, -16.0, 0.0));
        assert_eq!(
            c.events().payloads().cloned().collect::<Vec<_>>(),
            vec![GlobeEvent::DragStart, GlobeEvent::DragEnd]
        );
    }

    #[test]
    fn drag_uses_css_pixels_on_a_scaled_canvas() {
        let mut c = controller();
        // 1.8x backing store: 1440x1080 canvas shown in an 800x600 box at (10, 20).
        let mapping = PointerMapping {
            origin: [10.0, 20.0],
            css_size: [800.0, 600.0],
            canvas_size: [1440.0, 1080.0],
        };
        c.on_drag_start(mapping.drag_point([110.0, 120.0]));
        assert!(c.on_drag(mapping.drag_point([150.0, 104.0])));
        assert_eq!(c.state().rotation, Rotation::new(-90.0, -16.0, 0.0));
        assert_eq!(mapping.pick_point([110.0, 120.0]), [180.0, 180.0]);
    }

    #[test]
    fn drag_end_while_idle_is_ignored() {
        let mut c = controller();
        c.on_drag_end(Millis(10.0));
        assert!(c.events().events().is_empty());
    }

    #[test]
    fn auto_rotation_advances_longitude() {
        let mut c = controller();
        assert!(c.frame(Millis(50.0)));
        assert!((c.state().rotation.lon_deg - (-100.0 + 0.3)).abs() < 1e-9);
        // Over budget: skipped, but the clock still moves.
        assert!(!c.frame(Millis(250.0)));
        assert!(c.frame(Millis(300.0)));
        assert!((c.state().rotation.lon_deg - (-100.0 + 0.6)).abs() < 1e-9);
    }

    #[test]
    fn frame_at_exactly_the_budget_holds_still() {
        let mut c = controller();
        assert!(!c.frame(Millis(100.0)));
        assert_eq!(c.state().rotation.lon_deg, -100.0);
        assert!(c.frame(Millis(199.9)));
        assert!((c.state().rotation.lon_deg - (-100.0 + 99.9 * 0.006)).abs() < 1e-9);
    }

    #[test]
    fn hover_enters_then_leaves_off_globe() {
        let mut c = controller();
        let egypt = screen_of(&c, 30.0, 25.0);

        c.on_pointer_move(egypt, Millis(10.0));
        let k = FeatureKey::new(0);
        assert_eq!(c.state().hovered(), Some(k));
        assert_eq!(c.label().text, "Egypt");
        assert_eq!(c.label().color, Some(Rgb::WHITE));
        assert!(c.animator().is_active(k));

        c.on_pointer_move(egypt, Millis(20.0));
        c.on_pointer_move([-50.0, -50.0], Millis(30.0));
        assert_eq!(c.state().hovered(), None);
        assert_eq!(c.label().text, "");
        assert!(!c.animator().is_active(k));

        let hover_events: Vec<_> = c
            .events()
            .payloads()
            .filter(|e| matches!(e, GlobeEvent::Enter { .. } | GlobeEvent::Leave { .. }))
            .cloned()
            .collect();
        assert_eq!(
            hover_events,
            vec![
                GlobeEvent::Enter {
                    feature: k,
                    name: "Egypt".to_string()
                },
                GlobeEvent::Leave { feature: k },
            ]
        );
    }

    #[test]
    fn moving_between_countries_leaves_first() {
        let mut c = controller();
        let egypt = screen_of(&c, 30.0, 25.0);
        let saudi = screen_of(&c, 45.0, 22.0);
        c.on_pointer_move(egypt, Millis(0.0));
        c.on_pointer_move(saudi, Millis(5.0));
        assert_eq!(c.state().hovered(), Some(FeatureKey::new(1)));
        assert_eq!(c.label().text, "Saudi Arabia");
        assert!(!c.animator().is_active(FeatureKey::new(0)));
        assert!(c.animator().is_active(FeatureKey::new(1)));

        let tail: Vec<_> = c.events().payloads().cloned().collect();
        assert_eq!(
            tail[1..].to_vec(),
            vec![
                GlobeEvent::Leave {
                    feature: FeatureKey::new(0)
                },
                GlobeEvent::Enter {
                    feature: FeatureKey::new(1),
                    name: "Saudi Arabia".to_string()
                },
            ]
        );
    }

    #[test]
    fn highlight_frames_draw_on_top_of_the_scene() {
        let mut c = controller();
        let egypt = screen_of(&c, 30.0, 25.0);
        c.on_pointer_move(egypt, Millis(0.0));
        // Holds the globe still.
        c.on_drag_start([0.0, 0.0]);

        assert!(c.frame(Millis(1000.0)));
        let fills: Vec<FillStyle> = c.surface().fills().map(|(_, s)| s).collect();
        let palette = GlobeConfig::default().palette();
        let last = fills.last().copied().expect("highlight fill");
        assert_eq!(last.color, palette.land.lerp(palette.highlight, 0.5));
        assert_eq!(last.alpha, 0.5);

        assert!(c.frame(Millis(4000.0)));
        assert!(!c.frame(Millis(4016.0)));
    }
}
