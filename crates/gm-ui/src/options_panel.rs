//! Options panel: collects a layer's option editors and draws them against its options document

use gm_core::options::{set_value_at, value_at};
use gm_core::{
    CustomEditorItem, MapLayerHandler, OptionsUIBuilder, SelectItem, TextInputItem,
};
use gm_layers::data::arrows::ARROW_STYLE_EDITOR;
use gm_layers::style::ArrowStyleConfig;
use serde_json::Value;

use crate::style_editor::ArrowStyleEditor;
use crate::widget_utils::WidgetId;

/// One registered editor
#[derive(Debug, Clone, PartialEq)]
pub enum OptionItem {
    Select(SelectItem),
    TextInput(TextInputItem),
    Custom(CustomEditorItem),
}

impl OptionItem {
    pub fn path(&self) -> &str {
        match self {
            OptionItem::Select(item) => &item.path,
            OptionItem::TextInput(item) => &item.path,
            OptionItem::Custom(item) => &item.path,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            OptionItem::Select(item) => &item.name,
            OptionItem::TextInput(item) => &item.name,
            OptionItem::Custom(item) => &item.name,
        }
    }

    fn default_value(&self) -> Option<Value> {
        match self {
            OptionItem::Select(item) => item.default_value.clone(),
            OptionItem::TextInput(_) => None,
            OptionItem::Custom(item) => Some(item.default_value.clone()),
        }
    }
}

/// egui implementation of the options UI builder
#[derive(Debug, Default)]
pub struct OptionsPanel {
    id: String,
    items: Vec<OptionItem>,
    /// Field names offered to field-bound editors
    fields: Vec<String>,
}

impl OptionsPanel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Panel holding the editors a layer registers
    pub fn for_layer(id: impl Into<String>, handler: &dyn MapLayerHandler) -> Self {
        let mut panel = Self::new(id);
        handler.register_options_ui(&mut panel);
        tracing::debug!("Options panel {} has {} editors", panel.id, panel.items.len());
        panel
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn items(&self) -> &[OptionItem] {
        &self.items
    }

    /// Fill unset paths with the editors' default values. Returns whether anything was written.
    pub fn apply_defaults(&self, options: &mut Value) -> bool {
        let mut changed = false;
        for item in &self.items {
            if value_at(options, item.path()).is_some() {
                continue;
            }
            if let Some(default) = item.default_value() {
                set_value_at(options, item.path(), default);
                changed = true;
            }
        }
        changed
    }

    /// Draw every editor. Returns whether `options` was changed.
    pub fn ui(&self, ui: &mut egui::Ui, options: &mut Value) -> bool {
        let mut changed = false;
        for item in &self.items {
            ui.push_id(WidgetId::new(&self.id).with(item.path()).id(), |ui| {
                ui.strong(item.name());
                let edited = match item {
                    OptionItem::Select(select) => self.select_ui(ui, select, options),
                    OptionItem::TextInput(input) => text_input_ui(ui, input, options),
                    OptionItem::Custom(custom) => self.custom_ui(ui, custom, options),
                };
                if let Some(value) = edited {
                    set_value_at(options, item.path(), value);
                    changed = true;
                }
            });
            ui.add_space(6.0);
        }
        changed
    }

    fn select_ui(&self, ui: &mut egui::Ui, item: &SelectItem, options: &Value) -> Option<Value> {
        let current = value_at(options, &item.path)
            .or(item.default_value.as_ref())
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let selected_label = item
            .options
            .iter()
            .find(|o| o.value == current)
            .map_or(current.as_str(), |o| o.label.as_str());

        let mut selected = current.clone();
        egui::ComboBox::from_id_source(WidgetId::new(&self.id).with(&item.path).build())
            .selected_text(selected_label)
            .show_ui(ui, |ui| {
                for option in &item.options {
                    ui.selectable_value(&mut selected, option.value.clone(), option.label.as_str());
                }
            });

        (selected != current).then(|| Value::String(selected))
    }

    fn custom_ui(
        &self,
        ui: &mut egui::Ui,
        item: &CustomEditorItem,
        options: &Value,
    ) -> Option<Value> {
        if item.editor != ARROW_STYLE_EDITOR {
            ui.label(format!("No editor for {}", item.editor));
            return None;
        }

        let stored = value_at(options, &item.path).unwrap_or(&item.default_value);
        let style: ArrowStyleConfig = match serde_json::from_value(stored.clone()) {
            Ok(style) => style,
            Err(e) => {
                tracing::warn!("Invalid style at {}: {}, editing defaults", item.path, e);
                ArrowStyleConfig::with_defaults()
            }
        };
        let simple = item
            .settings
            .get("simpleFixedValues")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let editor = ArrowStyleEditor::new(WidgetId::new(&self.id).with(&item.id), &self.fields);
        let edited = editor.ui(ui, &style, simple)?;
        match serde_json::to_value(edited) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Could not store style at {}: {}", item.path, e);
                None
            }
        }
    }
}

fn text_input_ui(ui: &mut egui::Ui, item: &TextInputItem, options: &Value) -> Option<Value> {
    let current = value_at(options, &item.path)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let mut text = current.clone();

    let mut edit = egui::TextEdit::singleline(&mut text);
    if let Some(placeholder) = &item.placeholder {
        edit = edit.hint_text(placeholder.as_str());
    }
    let response = ui.add(edit);
    if let Some(description) = &item.description {
        response.clone().on_hover_text(description.as_str());
    }

    (response.changed() && text != current).then(|| Value::String(text))
}

impl OptionsUIBuilder for OptionsPanel {
    fn add_select(&mut self, item: SelectItem) {
        self.items.push(OptionItem::Select(item));
    }

    fn add_text_input(&mut self, item: TextInputItem) {
        self.items.push(OptionItem::TextInput(item));
    }

    fn add_custom_editor(&mut self, item: CustomEditorItem) {
        self.items.push(OptionItem::Custom(item));
    }
}
