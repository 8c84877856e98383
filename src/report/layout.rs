//! Positioned text on fixed-size pages, built top-down with a vertical cursor.

use super::metrics::Font;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Distance from the top edge to the first baseline.
    pub margin_top: f32,
    /// Nothing is drawn below this baseline.
    pub margin_bottom: f32,
}

impl PageGeometry {
    pub const LETTER: PageGeometry = PageGeometry {
        width: 612.0,
        height: 792.0,
        margin_top: 50.0,
        margin_bottom: 50.0,
    };

    fn top(&self) -> f32 {
        self.height - self.margin_top
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub font: Font,
    pub size: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl Document {
    /// Every run's text, page by page, top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|page| page.runs.iter().map(|run| run.text.as_str()))
    }
}

pub struct LayoutWriter {
    geometry: PageGeometry,
    pages: Vec<Page>,
    y: f32,
}

impl LayoutWriter {
    pub fn new(geometry: PageGeometry) -> Self {
        LayoutWriter {
            geometry,
            pages: vec![Page::default()],
            y: geometry.top(),
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Draws `text` on the current baseline, starting a new page first if the
    /// cursor has gone past the bottom margin.
    pub fn text(&mut self, x: f32, font: Font, size: f32, text: impl Into<String>) {
        if self.y < self.geometry.margin_bottom {
            self.pages.push(Page::default());
            self.y = self.geometry.top();
        }
        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.runs.push(TextRun { x, y, font, size, text: text.into() });
        }
    }

    pub fn centered(&mut self, font: Font, size: f32, text: &str) {
        let x = (self.geometry.width - font.text_width(text, size)) / 2.0;
        self.text(x, font, size, text);
    }

    /// Word-wraps `text` to `max_width` and draws one line per `leading`.
    /// The cursor ends one `leading` below the last line.
    pub fn wrapped(&mut self, x: f32, font: Font, size: f32, text: &str, max_width: f32, leading: f32) {
        for line in wrap(text, font, size, max_width) {
            self.text(x, font, size, line);
            self.advance(leading);
        }
    }

    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    pub fn finish(self) -> Document {
        Document {
            geometry: self.geometry,
            pages: self.pages,
        }
    }
}

/// Greedy word wrap. A line grows while it still fits in `max_width`; a word
/// that can never fit gets a line to itself.
pub fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };

        if font.text_width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(current);
            }
            current = word.to_owned();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::HIGH_RISK_MESSAGE;

    #[test]
    fn wraps_long_text_within_width() {
        let max = 412.0;
        assert!(Font::HelveticaBold.text_width(HIGH_RISK_MESSAGE, 12.0) > max);

        let lines = wrap(HIGH_RISK_MESSAGE, Font::HelveticaBold, 12.0, max);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(Font::HelveticaBold.text_width(line, 12.0) <= max, "{line:?} too wide");
        }
        assert_eq!(lines.join(" "), HIGH_RISK_MESSAGE.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap("Score indicates low risk.", Font::Helvetica, 12.0, 412.0);
        assert_eq!(lines, vec!["Score indicates low risk."]);
        assert!(wrap("   ", Font::Helvetica, 12.0, 412.0).is_empty());
    }

    #[test]
    fn oversized_word_gets_its_own_line() {
        let huge = "W".repeat(60);
        let text = format!("see {huge} now");
        let lines = wrap(&text, Font::Helvetica, 12.0, 100.0);
        assert_eq!(lines, vec!["see".to_owned(), huge.clone(), "now".to_owned()]);

        let alone = wrap(&huge, Font::Helvetica, 12.0, 100.0);
        assert_eq!(alone, vec![huge]);
    }

    #[test]
    fn breaks_page_past_bottom_margin() {
        let geometry = PageGeometry {
            width: 200.0,
            height: 100.0,
            margin_top: 10.0,
            margin_bottom: 10.0,
        };
        let mut writer = LayoutWriter::new(geometry);
        for i in 0..10 {
            writer.text(10.0, Font::Helvetica, 12.0, format!("line {i}"));
            writer.advance(20.0);
        }
        let doc = writer.finish();

        // baselines 90,70,50,30,10 fit; the cursor then drops below 10
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].runs.len(), 5);
        assert_eq!(doc.pages[1].runs[0].y, 90.0);
        assert_eq!(doc.lines().count(), 10);
        for page in &doc.pages {
            assert!(page.runs.iter().all(|run| run.y >= geometry.margin_bottom));
        }
    }

    #[test]
    fn centers_text() {
        let mut writer = LayoutWriter::new(PageGeometry::LETTER);
        writer.centered(Font::HelveticaBold, 24.0, "Title");
        let doc = writer.finish();
        let run = &doc.pages[0].runs[0];
        let width = Font::HelveticaBold.text_width("Title", 24.0);
        assert!((run.x * 2.0 + width - 612.0).abs() < 1e-3);
        assert_eq!(run.y, 742.0);
    }
}
