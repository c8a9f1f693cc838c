//! Contract between layer plugins and the host's options editor

use serde_json::Value;

/// One choice of a select option
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// A drop-down bound to a path in the layer options
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    /// Dotted path inside the layer options, e.g. `config.theme`
    pub path: String,
    pub name: String,
    pub options: Vec<SelectOption>,
    pub default_value: Option<Value>,
}

/// A free-text input bound to a path in the layer options
#[derive(Debug, Clone, PartialEq)]
pub struct TextInputItem {
    pub path: String,
    pub name: String,
    pub description: Option<String>,
    pub placeholder: Option<String>,
}

/// A plugin-specific editor bound to a path in the layer options
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEditorItem {
    pub id: String,
    pub path: String,
    pub name: String,
    /// Which editor the host should render
    pub editor: String,
    pub settings: Value,
    pub default_value: Value,
}

/// Collects the option editors a layer wants shown in the settings panel
pub trait OptionsUIBuilder {
    fn add_select(&mut self, item: SelectItem);

    fn add_text_input(&mut self, item: TextInputItem);

    fn add_custom_editor(&mut self, item: CustomEditorItem);
}

/// Read a dotted path out of a JSON document
pub fn value_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |node, key| node.get(key))
}

/// Write a value at a dotted path, creating intermediate objects as needed
pub fn set_value_at(root: &mut Value, path: &str, value: Value) {
    if !root.is_object() {
        *root = Value::Object(Default::default());
    }
    let Value::Object(map) = root else {
        return;
    };
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map.entry(head.to_string()).or_insert(Value::Null);
            set_value_at(child, rest, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_at_path() {
        let options = json!({ "config": { "theme": "Pale" } });
        assert_eq!(value_at(&options, "config.theme"), Some(&json!("Pale")));
        assert_eq!(value_at(&options, "config.style"), None);
    }

    #[test]
    fn test_set_value_creates_parents() {
        let mut options = json!({ "type": "arrows" });
        set_value_at(&mut options, "config.style.opacity", json!(0.5));
        assert_eq!(options["config"]["style"]["opacity"], json!(0.5));
        assert_eq!(options["type"], json!("arrows"));
    }
}
