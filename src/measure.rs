use unicode_width::UnicodeWidthStr;

pub struct TextMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub header_padding: f64,
    pub min_node_width: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 20.0,
            padding_x: 12.0,
            padding_y: 6.0,
            header_padding: 4.0,
            min_node_width: 90.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        UnicodeWidthStr::width(text) as f64 * self.char_width
    }

    pub fn header_height(&self) -> f64 {
        self.line_height + self.header_padding * 2.0
    }

    /// Record-node size: header row sized to the table name, body sized to
    /// the widest field label with one line per field.
    pub fn node_size(&self, label: &str, fields: &[String]) -> (f64, f64) {
        let header_width = self.text_width(label);
        let max_field_width = fields
            .iter()
            .map(|f| self.text_width(f))
            .fold(0.0, f64::max);

        let content_width = header_width.max(max_field_width) + self.padding_x * 2.0;
        let width = content_width.max(self.min_node_width);

        let body_height = if fields.is_empty() {
            0.0
        } else {
            fields.len() as f64 * self.line_height + self.padding_y * 2.0
        };

        (width, self.header_height() + body_height)
    }
}
