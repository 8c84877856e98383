use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use super::{
    layout::Document,
    metrics::{self, Font},
};

const CATALOG_ID: Ref = Ref::new(1);
const PAGE_TREE_ID: Ref = Ref::new(2);
const REGULAR_ID: Ref = Ref::new(3);
const BOLD_ID: Ref = Ref::new(4);
const INFO_ID: Ref = Ref::new(5);
const FIRST_PAGE_ID: i32 = 6;

fn resource_name(font: Font) -> Name<'static> {
    match font {
        Font::Helvetica => Name(b"F1"),
        Font::HelveticaBold => Name(b"F2"),
    }
}

impl Document {
    /// Serializes the layout into PDF bytes, held in memory.
    pub fn to_pdf(&self, title: &str) -> Vec<u8> {
        let mut pdf = Pdf::new();

        // each page takes two ids: the page object and its content stream
        let page_ids: Vec<(Ref, Ref)> = (0..self.pages.len() as i32)
            .map(|i| {
                let id = FIRST_PAGE_ID + 2 * i;
                (Ref::new(id), Ref::new(id + 1))
            })
            .collect();

        pdf.catalog(CATALOG_ID).pages(PAGE_TREE_ID);
        pdf.pages(PAGE_TREE_ID)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);
        pdf.document_info(INFO_ID)
            .title(TextStr(title))
            .creator(TextStr(env!("CARGO_PKG_NAME")));

        for (font, id) in [(Font::Helvetica, REGULAR_ID), (Font::HelveticaBold, BOLD_ID)] {
            pdf.type1_font(id)
                .base_font(Name(font.base_name()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        let media_box = Rect::new(0.0, 0.0, self.geometry.width, self.geometry.height);
        for (page, &(page_id, content_id)) in self.pages.iter().zip(&page_ids) {
            let mut pdf_page = pdf.page(page_id);
            pdf_page.media_box(media_box);
            pdf_page.parent(PAGE_TREE_ID);
            pdf_page.contents(content_id);
            pdf_page
                .resources()
                .fonts()
                .pair(resource_name(Font::Helvetica), REGULAR_ID)
                .pair(resource_name(Font::HelveticaBold), BOLD_ID);
            pdf_page.finish();

            let mut content = Content::new();
            for run in &page.runs {
                let bytes = metrics::encode(&run.text);
                content.begin_text();
                content.set_font(resource_name(run.font), run.size);
                content.next_line(run.x, run.y);
                content.show(Str(&bytes));
                content.end_text();
            }
            pdf.stream(content_id, &content.finish());
        }

        pdf.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::{LayoutWriter, PageGeometry};

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn writes_a_pdf_per_page() {
        let geometry = PageGeometry { height: 160.0, ..PageGeometry::LETTER };
        let mut writer = LayoutWriter::new(geometry);
        for i in 0..6 {
            writer.text(100.0, Font::Helvetica, 12.0, format!("Question {i}: 1"));
            writer.advance(20.0);
        }
        let doc = writer.finish();
        assert_eq!(doc.pages.len(), 2);

        let bytes = doc.to_pdf("test");
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"/Count 2"));
        assert!(contains(&bytes, b"/BaseFont /Helvetica-Bold"));
        assert!(contains(&bytes, b"(Question 5: 1) Tj"));
        assert!(contains(&bytes, b"%%EOF"));
    }
}
