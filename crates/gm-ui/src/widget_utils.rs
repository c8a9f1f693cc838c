//! Widget id helpers so editors of several layers can share one panel

use egui::Id;
use std::fmt::Display;

/// Builds ids of the form `layer_path_component`
#[derive(Debug, Clone)]
pub struct WidgetId {
    components: Vec<String>,
}

impl WidgetId {
    pub fn new(base: impl Display) -> Self {
        Self {
            components: vec![base.to_string()],
        }
    }

    pub fn with(mut self, component: impl Display) -> Self {
        self.components.push(component.to_string());
        self
    }

    pub fn build(&self) -> String {
        self.components.join("_")
    }

    pub fn id(&self) -> Id {
        Id::new(self.build())
    }
}

/// Run one frame of a headless egui context and return what `draw` produced
#[cfg(test)]
pub(crate) fn headless_frame<R>(draw: impl FnOnce(&mut egui::Ui) -> R) -> R {
    let ctx = egui::Context::default();
    let mut draw = Some(draw);
    let mut result = None;
    let _ = ctx.run(egui::RawInput::default(), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(draw) = draw.take() {
                result = Some(draw(ui));
            }
        });
    });
    result.expect("central panel was drawn")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_id_builder() {
        let id = WidgetId::new("arrows").with("config.style").with("color_field");
        assert_eq!(id.build(), "arrows_config.style_color_field");
    }
}
