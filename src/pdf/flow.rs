use super::cursor::{LayoutState, PageCursor};
use super::writer::{DocumentWriter, ImageRect, Page, PageState, TextStyle};

/// What the section renderer and image placer need from the page machinery.
/// `PageFlow` is the real implementation; tests substitute a recorder.
pub(super) trait PageSink {
    /// Reserve `height` points of vertical space, breaking the page first if
    /// the block does not fit. Returns the y the block starts at (its top).
    fn reserve(&mut self, height: f32) -> f32;

    /// Blank space that never starts a page on its own: when it does not
    /// fit, the cursor stops at the bottom margin and the next reservation
    /// breaks.
    fn skip(&mut self, height: f32);

    fn draw_text(&mut self, x: f32, y: f32, text: &str, style: TextStyle, font_size: f32);

    fn draw_image(&mut self, rect: ImageRect);

    fn state(&self) -> &LayoutState;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutStats {
    pub pages: usize,
    pub lines: usize,
    pub page_breaks: usize,
    /// Blocks taller than the printable area, placed at the top of a page
    /// and clamped at the bottom margin.
    pub oversized_blocks: usize,
}

/// The single authority over the current page: a cursor plus the writer it
/// finalizes pages into.
pub(super) struct PageFlow {
    cursor: PageCursor,
    writer: DocumentWriter,
    stats: LayoutStats,
}

impl PageFlow {
    pub(super) fn new(cursor: PageCursor) -> Self {
        PageFlow {
            cursor,
            writer: DocumentWriter::new(),
            stats: LayoutStats::default(),
        }
    }

    fn break_page(&mut self, height: f32) {
        log::debug!(
            "page break after page {} at y={:.1} (block {:.1}pt)",
            self.writer.page_number(),
            self.cursor.position(),
            height,
        );
        self.writer.open_page();
        self.cursor.reset();
        self.stats.page_breaks += 1;
    }

    fn place_oversized(&mut self, height: f32) -> f32 {
        log::warn!(
            "block of {:.1}pt exceeds the printable height {:.1}pt on page {}; it will overrun the bottom margin",
            height,
            self.cursor.printable_height(),
            self.writer.page_number(),
        );
        self.stats.oversized_blocks += 1;
        let top = self.cursor.position();
        self.cursor.advance_clamped(height);
        top
    }

    pub(super) fn into_parts(self) -> (DocumentWriter, LayoutStats) {
        (self.writer, self.stats)
    }

    /// Finish layout and return the finalized pages.
    pub(super) fn finish(self) -> (Vec<Page>, LayoutStats) {
        let (writer, mut stats) = self.into_parts();
        let pages = writer.finish();
        stats.pages = pages.len();
        (pages, stats)
    }
}

impl PageSink for PageFlow {
    fn reserve(&mut self, height: f32) -> f32 {
        if self.cursor.fits(height) {
            let top = self.cursor.position();
            self.cursor.advance(height);
            return top;
        }
        // Breaking an untouched page gains nothing.
        let fresh = self.writer.state() == PageState::Empty && self.cursor.is_at_top();
        if !fresh {
            self.break_page(height);
            if self.cursor.fits(height) {
                let top = self.cursor.position();
                self.cursor.advance(height);
                return top;
            }
        }
        self.place_oversized(height)
    }

    fn skip(&mut self, height: f32) {
        self.cursor.advance_clamped(height);
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, style: TextStyle, font_size: f32) {
        self.stats.lines += 1;
        self.writer.draw_text(x, y, text, style, font_size);
    }

    fn draw_image(&mut self, rect: ImageRect) {
        self.writer.draw_image(rect);
    }

    fn state(&self) -> &LayoutState {
        self.cursor.state()
    }
}
