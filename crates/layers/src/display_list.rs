use crate::render::{Label, Shape, Surface};
use crate::symbology::{FillStyle, Rgb};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Fill { shape: Shape, style: FillStyle },
}

/// Headless surface that records the commands of the current frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn fills(&self) -> impl Iterator<Item = (&Shape, FillStyle)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Fill { shape, style } => Some((shape, *style)),
            DrawCommand::Clear => None,
        })
    }
}

impl Surface for DisplayList {
    // Clearing starts a new frame.
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill(&mut self, shape: &Shape, style: FillStyle) {
        self.commands.push(DrawCommand::Fill {
            shape: shape.clone(),
            style,
        });
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub color: Option<Rgb>,
}

impl Label for TextLabel {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_color(&mut self, color: Rgb) {
        self.color = Some(color);
    }
}
