use regex::Regex;
use serde_json::Value;

/// One field of an output-shape template: a plain description, a list of
/// candidate values to classify into, or a nested template.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeField {
    Text(String),
    Options(Vec<String>),
    Nested(OutputShape),
}

/// Caller-supplied template describing the JSON shape the model should reply
/// with. Purely descriptive metadata: it steers the prompt, it is never
/// validated against the parsed reply (deeper validation is the caller's job).
///
/// Keys are unique within a nesting level; insertion order is preserved
/// because it carries through to the rendered prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputShape {
    fields: Vec<(String, ShapeField)>,
}

impl OutputShape {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field with a free-text description. Descriptions may embed
    /// `<...>` placeholder markers the model is told to fill in.
    pub fn field(mut self, name: &str, description: &str) -> Self {
        self.fields
            .push((name.to_string(), ShapeField::Text(description.to_string())));
        self
    }

    /// Add a field whose value should be classified into one of the given
    /// options.
    pub fn options(mut self, name: &str, options: &[&str]) -> Self {
        let options = options.iter().map(|o| o.to_string()).collect();
        self.fields
            .push((name.to_string(), ShapeField::Options(options)));
        self
    }

    /// Add a field described by a nested template.
    pub fn nested(mut self, name: &str, shape: OutputShape) -> Self {
        self.fields
            .push((name.to_string(), ShapeField::Nested(shape)));
        self
    }

    /// Render the template as the JSON-like text sent to the model.
    pub fn render(&self) -> String {
        let mut out = String::from("{");
        for (i, (name, field)) in self.fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&Value::String(name.clone()).to_string());
            out.push(':');
            match field {
                ShapeField::Text(description) => {
                    out.push_str(&Value::String(description.clone()).to_string());
                }
                ShapeField::Options(options) => {
                    out.push('[');
                    for (j, option) in options.iter().enumerate() {
                        if j > 0 {
                            out.push(',');
                        }
                        out.push_str(&Value::String(option.clone()).to_string());
                    }
                    out.push(']');
                }
                ShapeField::Nested(shape) => {
                    out.push_str(&shape.render());
                }
            }
        }
        out.push('}');
        out
    }

    /// True when any rendered description carries a `<...>` placeholder
    /// marker, meaning the model must generate content to replace it.
    pub fn has_placeholders(&self) -> bool {
        let re = Regex::new(r"<.*?>").unwrap();
        re.is_match(&self.render())
    }

    /// True when the rendered template carries a `[...]` list marker, meaning
    /// a list-shaped reply is expected.
    pub fn expects_list(&self) -> bool {
        let re = Regex::new(r"\[.*?\]").unwrap();
        re.is_match(&self.render())
    }

    /// Build the formatting instructions appended to the system message on
    /// every attempt.
    pub fn format_instructions(&self) -> String {
        let list_output = self.expects_list();

        let mut prompt = format!(
            "\nYou are to output {} the following in json format: {}. \nDo not put quotation marks or escape character \\ in the output fields.",
            if list_output { "an array of objects in" } else { "" },
            self.render()
        );

        if list_output {
            prompt.push_str(
                "\nIf output field is a list, classify output into the best element of the list.",
            );
        }

        if self.has_placeholders() {
            prompt.push_str(
                "\nAny text enclosed by < and > indicates you must generate content to replace it.",
            );
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_preserves_order() {
        let shape = OutputShape::new()
            .field("question", "the question")
            .field("answer", "the answer");

        assert_eq!(
            shape.render(),
            r#"{"question":"the question","answer":"the answer"}"#
        );
    }

    #[test]
    fn test_render_nested_and_options() {
        let shape = OutputShape::new()
            .options("difficulty", &["easy", "medium", "hard"])
            .nested("meta", OutputShape::new().field("topic", "the topic"));

        assert_eq!(
            shape.render(),
            r#"{"difficulty":["easy","medium","hard"],"meta":{"topic":"the topic"}}"#
        );
    }

    #[test]
    fn test_placeholder_detection() {
        let plain = OutputShape::new().field("title", "title of the unit");
        assert!(!plain.has_placeholders());

        let dynamic = OutputShape::new().field("title", "a title about <topic>");
        assert!(dynamic.has_placeholders());
    }

    #[test]
    fn test_list_detection() {
        let plain = OutputShape::new().field("summary", "summary of the transcript");
        assert!(!plain.expects_list());

        // An options field renders as a JSON array, which is a list marker
        assert!(OutputShape::new().options("level", &["a", "b"]).expects_list());

        // So is a literal bracket inside a description
        assert!(
            OutputShape::new()
                .field("tags", "[tag1, tag2, ...]")
                .expects_list()
        );
    }

    #[test]
    fn test_format_instructions() {
        let shape = OutputShape::new().field("summary", "summary of the transcript");
        let instructions = shape.format_instructions();

        assert!(instructions.contains("in json format"));
        assert!(instructions.contains(r#"{"summary":"summary of the transcript"}"#));
        assert!(!instructions.contains("an array of objects"));
        assert!(!instructions.contains("enclosed by < and >"));

        let listy = OutputShape::new()
            .options("category", &["science", "history"])
            .field("name", "<generated name>");
        let instructions = listy.format_instructions();

        assert!(instructions.contains("an array of objects in"));
        assert!(instructions.contains("classify output into the best element"));
        assert!(instructions.contains("enclosed by < and >"));
    }
}
