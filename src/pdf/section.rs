use super::flow::PageSink;
use super::image::ImagePlacer;
use super::wrap::wrap_text;
use super::writer::TextStyle;
use crate::config::LayoutConfig;
use crate::fonts::FontEntry;
use crate::model::{Field, Section};

/// Renders titled sections top to bottom. Spacing between sections is owned
/// here, so sections must go through one renderer in document order.
pub(super) struct SectionRenderer<'a> {
    config: &'a LayoutConfig,
    regular: &'a FontEntry,
    bold: &'a FontEntry,
    figure: Option<&'a ImagePlacer>,
    sections_done: usize,
}

impl<'a> SectionRenderer<'a> {
    pub(super) fn new(
        config: &'a LayoutConfig,
        regular: &'a FontEntry,
        bold: &'a FontEntry,
        figure: Option<&'a ImagePlacer>,
    ) -> Self {
        SectionRenderer {
            config,
            regular,
            bold,
            figure,
            sections_done: 0,
        }
    }

    pub(super) fn render(&mut self, sink: &mut impl PageSink, section: &Section) {
        let c = self.config;
        if self.sections_done > 0 {
            sink.skip(c.section_gap);
        }
        let title_lines = wrap_text(
            section.title,
            self.bold,
            c.title_font_size,
            c.printable_width(),
            c.split_long_words,
        );
        for line in title_lines {
            let y = sink.reserve(c.title_advance);
            sink.draw_text(c.margin, y, &line, TextStyle::Bold, c.title_font_size);
        }

        if section.figure {
            match self.figure.take() {
                Some(placer) => {
                    placer.place(sink);
                }
                None => log::warn!(
                    "section '{}' wants the screenshot but it was already placed",
                    section.title
                ),
            }
        }

        for record in section.records {
            for field in record.fields() {
                self.render_field(sink, field);
                sink.skip(c.field_gap);
            }
            if section.list {
                sink.skip(c.record_gap);
            }
        }
        self.sections_done += 1;
    }

    fn render_field(&self, sink: &mut impl PageSink, field: &Field) {
        let c = self.config;
        let text = format!("{}: {}", c.field_names.apply(&field.name), field.value);
        let (font_size, leading, max_width) = {
            let state = sink.state();
            (
                state.font_size,
                state.leading,
                state.page_width - 2.0 * state.margin,
            )
        };
        for line in wrap_text(&text, self.regular, font_size, max_width, c.split_long_words) {
            let y = sink.reserve(leading);
            sink.draw_text(c.margin, y, &line, TextStyle::Regular, font_size);
        }
    }
}
