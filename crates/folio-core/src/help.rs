use crate::keymap::Binding;
use crate::render;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Debug)]
pub struct HintBarOptions {
    pub style: Style,
    pub key_style: Style,
    pub status_style: Style,
    pub separator: String,
}

impl Default for HintBarOptions {
    fn default() -> Self {
        Self {
            style: Style::default(),
            key_style: Style::default(),
            status_style: Style::default(),
            separator: " • ".to_string(),
        }
    }
}

/// One-row bar listing key hints on the left and a status (e.g. reading progress) on the right.
#[derive(Clone, Debug, Default)]
pub struct HintBar {
    bindings: Vec<Binding>,
    status: Option<String>,
    options: HintBarOptions,
}

impl HintBar {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self {
            bindings,
            status: None,
            options: HintBarOptions::default(),
        }
    }

    pub fn with_options(bindings: Vec<Binding>, options: HintBarOptions) -> Self {
        Self {
            bindings,
            status: None,
            options,
        }
    }

    pub fn set_bindings(&mut self, bindings: Vec<Binding>) {
        self.bindings = bindings;
    }

    pub fn set_status(&mut self, status: Option<String>) {
        self.status = status;
    }

    pub fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        buf.set_style(area, self.options.style);
        let mut hints_w = area.width;
        if let Some(status) = &self.status {
            let cols = (UnicodeWidthStr::width(status.as_str()) as u16).min(area.width);
            let x = area.x + area.width - cols;
            render::render_str_clipped(x, area.y, cols, buf, status, self.options.status_style);
            hints_w = area.width.saturating_sub(cols + 1);
        }

        let spans = self.to_spans();
        render::render_spans_clipped(area.x, area.y, hints_w, buf, &spans, self.options.style);
    }

    fn to_spans(&self) -> Vec<Span<'static>> {
        let mut spans: Vec<Span<'static>> = Vec::new();
        for (i, b) in self.bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    self.options.separator.clone(),
                    self.options.style,
                ));
            }
            spans.push(Span::styled(b.help_key.clone(), self.options.key_style));
            spans.push(Span::styled(format!(" {}", b.help_desc), self.options.style));
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap;
    use ratatui::buffer::Buffer;

    fn row(buf: &Buffer) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn hint_bar_renders_narrow_width() {
        let bindings = vec![keymap::Binding::new(
            "q",
            "quit",
            vec![keymap::key_char('q')],
        )];
        let hb = HintBar::new(bindings);
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        hb.render_ref(Rect::new(0, 0, 3, 1), &mut buf);
        assert_eq!(row(&buf), "q q");
    }

    #[test]
    fn status_is_right_aligned() {
        let mut hb = HintBar::new(vec![keymap::Binding::new(
            "q",
            "quit",
            vec![keymap::key_char('q')],
        )]);
        hb.set_status(Some("42%".to_string()));
        let mut buf = Buffer::empty(Rect::new(0, 0, 12, 1));
        hb.render_ref(Rect::new(0, 0, 12, 1), &mut buf);
        assert_eq!(row(&buf), "q quit   42%");
    }
}
