//! Editor for the arrow style option

use egui::Color32;
use gm_core::Rgba;
use gm_layers::style::types::{
    DEFAULT_COLOR, DEFAULT_LINE_WIDTH, DEFAULT_OPACITY, LINE_WIDTH_MAX, LINE_WIDTH_MIN,
};
use gm_layers::style::{
    ArrowStyleConfig, ColorDimensionConfig, ColorScheme, OpacityConfig, ScaleDimensionConfig,
};

use crate::widget_utils::WidgetId;

/// Where a style attribute takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    Fixed,
    Field,
}

impl ValueMode {
    pub fn label(&self) -> &'static str {
        match self {
            ValueMode::Fixed => "Fixed",
            ValueMode::Field => "Field",
        }
    }
}

pub fn to_color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn from_color32(color: Color32) -> Rgba {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Rgba::from_rgba(r, g, b, a)
}

/// The fixed color of a style, with the default for unset or unparsable values
pub fn fixed_color(config: &ArrowStyleConfig) -> Rgba {
    config
        .color
        .as_ref()
        .and_then(|c| c.fixed.as_deref())
        .and_then(Rgba::parse)
        .or_else(|| Rgba::parse(DEFAULT_COLOR))
        .unwrap_or(Rgba::from_rgb(0xed, 0x1e, 0xa4))
}

pub fn fixed_opacity(config: &ArrowStyleConfig) -> f64 {
    config
        .opacity
        .as_ref()
        .and_then(OpacityConfig::fixed_value)
        .unwrap_or(DEFAULT_OPACITY)
}

pub fn fixed_line_width(config: &ArrowStyleConfig) -> f64 {
    config
        .line_width
        .as_ref()
        .and_then(|w| w.fixed)
        .unwrap_or(DEFAULT_LINE_WIDTH)
}

// A field binding is in progress as soon as `field` is present, even while empty
pub fn color_mode(config: &ArrowStyleConfig) -> ValueMode {
    match config.color.as_ref().and_then(|c| c.field.as_ref()) {
        Some(_) => ValueMode::Field,
        None => ValueMode::Fixed,
    }
}

pub fn line_width_mode(config: &ArrowStyleConfig) -> ValueMode {
    match config.line_width.as_ref().and_then(|w| w.field.as_ref()) {
        Some(_) => ValueMode::Field,
        None => ValueMode::Fixed,
    }
}

pub fn opacity_mode(config: &ArrowStyleConfig) -> ValueMode {
    match &config.opacity {
        Some(OpacityConfig::Scaled(scale)) if scale.field.is_some() => ValueMode::Field,
        _ => ValueMode::Fixed,
    }
}

/// Switch the color between a fixed value and a field binding
pub fn set_color_mode(config: &ArrowStyleConfig, mode: ValueMode) -> ArrowStyleConfig {
    let mut color = config.color.clone().unwrap_or_default();
    if color.fixed.is_none() {
        color.fixed = Some(DEFAULT_COLOR.to_string());
    }
    match mode {
        ValueMode::Fixed => {
            color.field = None;
            color.scheme = None;
        }
        ValueMode::Field => {
            color.field.get_or_insert_with(String::new);
            color.scheme.get_or_insert(ColorScheme::default());
        }
    }
    ArrowStyleConfig {
        color: Some(color),
        ..config.clone()
    }
}

pub fn set_line_width_mode(config: &ArrowStyleConfig, mode: ValueMode) -> ArrowStyleConfig {
    let mut width = config.line_width.clone().unwrap_or_default();
    width.fixed.get_or_insert(DEFAULT_LINE_WIDTH);
    width.min.get_or_insert(LINE_WIDTH_MIN);
    width.max.get_or_insert(LINE_WIDTH_MAX);
    match mode {
        ValueMode::Fixed => width.field = None,
        ValueMode::Field => {
            width.field.get_or_insert_with(String::new);
        }
    }
    ArrowStyleConfig {
        line_width: Some(width),
        ..config.clone()
    }
}

/// Switch opacity between the bare-number form and a scaled field binding
pub fn set_opacity_mode(config: &ArrowStyleConfig, mode: ValueMode) -> ArrowStyleConfig {
    let fixed = fixed_opacity(config);
    let opacity = match mode {
        ValueMode::Fixed => OpacityConfig::Fixed(fixed),
        ValueMode::Field => {
            let mut scale = match &config.opacity {
                Some(OpacityConfig::Scaled(scale)) => scale.clone(),
                _ => ScaleDimensionConfig::fixed(fixed),
            };
            scale.min.get_or_insert(0.0);
            scale.max.get_or_insert(1.0);
            scale.field.get_or_insert_with(String::new);
            OpacityConfig::Scaled(scale)
        }
    };
    ArrowStyleConfig {
        opacity: Some(opacity),
        ..config.clone()
    }
}

/// egui editor for an `ArrowStyleConfig`.
///
/// In simple mode only a fixed color and a fixed opacity are offered; otherwise
/// line width, color and opacity can each be fixed or bound to a field.
pub struct ArrowStyleEditor<'a> {
    id: WidgetId,
    fields: &'a [String],
}

impl<'a> ArrowStyleEditor<'a> {
    /// `fields` are offered as choices for field bindings; free text is used when empty
    pub fn new(id: WidgetId, fields: &'a [String]) -> Self {
        Self { id, fields }
    }

    /// Draw the editor. Returns the edited style when the user changed anything.
    pub fn ui(
        &self,
        ui: &mut egui::Ui,
        value: &ArrowStyleConfig,
        simple: bool,
    ) -> Option<ArrowStyleConfig> {
        let mut edited = None;

        if simple {
            self.fixed_color_ui(ui, value, &mut edited);
            self.fixed_opacity_ui(ui, value, &mut edited);
            return edited;
        }

        ui.label("Line width");
        let mode = self.mode_ui(ui, "line_width_mode", line_width_mode(value));
        if mode != line_width_mode(value) {
            edited = Some(set_line_width_mode(value, mode));
        }
        let current = edited.clone().unwrap_or_else(|| value.clone());
        match line_width_mode(&current) {
            ValueMode::Fixed => {
                let mut width = fixed_line_width(&current);
                ui.horizontal(|ui| {
                    ui.label("Width:");
                    let response = ui.add(
                        egui::DragValue::new(&mut width)
                            .speed(0.5)
                            .clamp_range(LINE_WIDTH_MIN..=LINE_WIDTH_MAX),
                    );
                    if response.changed() {
                        let mut config = current.clone();
                        let mut line_width = config.line_width.unwrap_or_default();
                        line_width.fixed = Some(width);
                        config.line_width = Some(line_width);
                        edited = Some(config);
                    }
                });
            }
            ValueMode::Field => {
                let mut scale = current.line_width.clone().unwrap_or_default();
                if self.scale_ui(ui, "line_width", &mut scale, LINE_WIDTH_MIN..=LINE_WIDTH_MAX) {
                    edited = Some(ArrowStyleConfig {
                        line_width: Some(scale),
                        ..current.clone()
                    });
                }
            }
        }

        ui.separator();
        ui.label("Color");
        let current = edited.clone().unwrap_or_else(|| value.clone());
        let mode = self.mode_ui(ui, "color_mode", color_mode(&current));
        if mode != color_mode(&current) {
            edited = Some(set_color_mode(&current, mode));
        }
        let current = edited.clone().unwrap_or_else(|| value.clone());
        match color_mode(&current) {
            ValueMode::Fixed => self.fixed_color_ui(ui, &current, &mut edited),
            ValueMode::Field => {
                let mut color = current.color.clone().unwrap_or_default();
                if self.color_field_ui(ui, &mut color) {
                    edited = Some(ArrowStyleConfig {
                        color: Some(color),
                        ..current.clone()
                    });
                }
            }
        }

        ui.separator();
        ui.label("Opacity");
        let current = edited.clone().unwrap_or_else(|| value.clone());
        let mode = self.mode_ui(ui, "opacity_mode", opacity_mode(&current));
        if mode != opacity_mode(&current) {
            edited = Some(set_opacity_mode(&current, mode));
        }
        let current = edited.clone().unwrap_or_else(|| value.clone());
        match (&current.opacity, opacity_mode(&current)) {
            (Some(OpacityConfig::Scaled(scale)), ValueMode::Field) => {
                let mut scale = scale.clone();
                if self.scale_ui(ui, "opacity", &mut scale, 0.0..=1.0) {
                    edited = Some(ArrowStyleConfig {
                        opacity: Some(OpacityConfig::Scaled(scale)),
                        ..current.clone()
                    });
                }
            }
            _ => self.fixed_opacity_ui(ui, &current, &mut edited),
        }

        edited
    }

    fn mode_ui(&self, ui: &mut egui::Ui, key: &str, current: ValueMode) -> ValueMode {
        let mut mode = current;
        ui.push_id(self.id.clone().with(key).id(), |ui| {
            ui.horizontal(|ui| {
                for choice in [ValueMode::Fixed, ValueMode::Field] {
                    ui.radio_value(&mut mode, choice, choice.label());
                }
            });
        });
        mode
    }

    fn fixed_color_ui(
        &self,
        ui: &mut egui::Ui,
        value: &ArrowStyleConfig,
        edited: &mut Option<ArrowStyleConfig>,
    ) {
        let mut color = to_color32(fixed_color(value));
        ui.horizontal(|ui| {
            ui.label("Color:");
            if ui.color_edit_button_srgba(&mut color).changed() {
                let mut config = edited.clone().unwrap_or_else(|| value.clone());
                let mut dimension = config.color.unwrap_or_default();
                dimension.fixed = Some(from_color32(color).to_hex());
                config.color = Some(dimension);
                *edited = Some(config);
            }
        });
    }

    fn fixed_opacity_ui(
        &self,
        ui: &mut egui::Ui,
        value: &ArrowStyleConfig,
        edited: &mut Option<ArrowStyleConfig>,
    ) {
        let mut opacity = fixed_opacity(value);
        ui.horizontal(|ui| {
            ui.label("Opacity:");
            let slider = egui::Slider::new(&mut opacity, 0.0..=1.0).step_by(0.1);
            if ui.add(slider).changed() {
                let mut config = edited.clone().unwrap_or_else(|| value.clone());
                config.opacity = Some(OpacityConfig::Fixed(opacity));
                *edited = Some(config);
            }
        });
    }

    fn color_field_ui(&self, ui: &mut egui::Ui, color: &mut ColorDimensionConfig) -> bool {
        let mut changed = false;
        let mut field = color.field.clone().unwrap_or_default();
        if self.field_ui(ui, "color_field", &mut field) {
            color.field = Some(field);
            changed = true;
        }

        let mut scheme = color.scheme.unwrap_or_default();
        ui.horizontal(|ui| {
            ui.label("Scheme:");
            egui::ComboBox::from_id_source(self.id.clone().with("color_scheme").build())
                .selected_text(scheme.label())
                .show_ui(ui, |ui| {
                    for choice in ColorScheme::ALL {
                        if ui.selectable_value(&mut scheme, choice, choice.label()).changed() {
                            changed = true;
                        }
                    }
                });
        });
        if changed {
            color.scheme = Some(scheme);
        }
        changed
    }

    fn scale_ui(
        &self,
        ui: &mut egui::Ui,
        key: &str,
        scale: &mut ScaleDimensionConfig,
        range: std::ops::RangeInclusive<f64>,
    ) -> bool {
        let mut changed = false;
        let mut field = scale.field.clone().unwrap_or_default();
        if self.field_ui(ui, &format!("{}_field", key), &mut field) {
            scale.field = Some(field);
            changed = true;
        }

        let mut min = scale.min.unwrap_or(*range.start());
        let mut max = scale.max.unwrap_or(*range.end());
        let speed = (range.end() - range.start()) / 100.0;
        ui.horizontal(|ui| {
            ui.label("Min:");
            changed |= ui
                .add(egui::DragValue::new(&mut min).speed(speed).clamp_range(range.clone()))
                .changed();
            ui.label("Max:");
            changed |= ui
                .add(egui::DragValue::new(&mut max).speed(speed).clamp_range(range.clone()))
                .changed();
        });
        if changed {
            scale.min = Some(min);
            scale.max = Some(max);
        }
        changed
    }

    fn field_ui(&self, ui: &mut egui::Ui, key: &str, field: &mut String) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.label("Field:");
            if self.fields.is_empty() {
                changed = ui.text_edit_singleline(field).changed();
                return;
            }
            let selected = match field.as_str() {
                "" => "Select field".to_string(),
                name => name.to_string(),
            };
            egui::ComboBox::from_id_source(self.id.clone().with(key).build())
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for name in self.fields {
                        if ui.selectable_value(field, name.clone(), name.as_str()).changed() {
                            changed = true;
                        }
                    }
                });
        });
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget_utils::headless_frame;

    fn width_by_weight() -> ArrowStyleConfig {
        ArrowStyleConfig {
            line_width: Some(ScaleDimensionConfig {
                fixed: Some(3.0),
                min: Some(2.0),
                max: Some(12.0),
                field: Some("weight".to_string()),
            }),
            ..ArrowStyleConfig::with_defaults()
        }
    }

    #[test]
    fn test_modes_of_defaults() {
        let config = ArrowStyleConfig::with_defaults();
        assert_eq!(color_mode(&config), ValueMode::Fixed);
        assert_eq!(line_width_mode(&config), ValueMode::Fixed);
        assert_eq!(opacity_mode(&config), ValueMode::Fixed);
        assert_eq!(fixed_color(&config), Rgba::from_rgb(0xed, 0x1e, 0xa4));
    }

    #[test]
    fn test_color_mode_switch_keeps_other_attributes() {
        let config = width_by_weight();
        let switched = set_color_mode(&config, ValueMode::Field);

        assert_eq!(color_mode(&switched), ValueMode::Field);
        assert_eq!(switched.line_width, config.line_width);
        assert_eq!(switched.opacity, config.opacity);
        // The fixed color survives as the fallback
        assert_eq!(switched.color.as_ref().unwrap().fixed.as_deref(), Some(DEFAULT_COLOR));

        let back = set_color_mode(&switched, ValueMode::Fixed);
        assert_eq!(back.color, config.color);
    }

    #[test]
    fn test_line_width_mode_switch() {
        let fixed = set_line_width_mode(&width_by_weight(), ValueMode::Fixed);
        let width = fixed.line_width.unwrap();
        assert_eq!(width.field, None);
        assert_eq!((width.fixed, width.min, width.max), (Some(3.0), Some(2.0), Some(12.0)));
    }

    #[test]
    fn test_opacity_mode_switch() {
        let config = ArrowStyleConfig::with_defaults();
        let scaled = set_opacity_mode(&config, ValueMode::Field);
        assert_eq!(opacity_mode(&scaled), ValueMode::Field);
        let Some(OpacityConfig::Scaled(scale)) = &scaled.opacity else {
            panic!("expected a scaled opacity");
        };
        assert_eq!((scale.fixed, scale.min, scale.max), (Some(0.8), Some(0.0), Some(1.0)));

        let fixed = set_opacity_mode(&scaled, ValueMode::Fixed);
        assert_eq!(fixed.opacity, Some(OpacityConfig::Fixed(0.8)));
        assert_eq!(fixed.color, config.color);
    }

    #[test]
    fn test_untouched_editor_reports_no_edit() {
        let fields = vec!["weight".to_string(), "carrier".to_string()];
        let editor = ArrowStyleEditor::new(WidgetId::new("arrows"), &fields);
        let bound = set_opacity_mode(
            &set_color_mode(&width_by_weight(), ValueMode::Field),
            ValueMode::Field,
        );

        for (style, simple) in [
            (ArrowStyleConfig::with_defaults(), false),
            (ArrowStyleConfig::with_defaults(), true),
            (bound, false),
        ] {
            let edited = headless_frame(|ui| editor.ui(ui, &style, simple));
            assert_eq!(edited, None);
        }
    }

    #[test]
    fn test_color_conversion() {
        let color = Rgba::from_rgb(0x12, 0x34, 0x56);
        assert_eq!(from_color32(to_color32(color)), color);
        assert_eq!(to_color32(color), Color32::from_rgb(0x12, 0x34, 0x56));
    }
}
