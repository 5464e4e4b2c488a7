use std::path::Path;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    Regular,
    Bold,
}

/// Placement of the screenshot, lower-left corner plus size, in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ImageRect {
    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
        font_size: f32,
    },
    Image { rect: ImageRect },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum PageState {
    Empty,
    Accumulating,
}

/// A finalized page: its draw commands in drawing order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub commands: Vec<DrawCommand>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            DrawCommand::Image { .. } => None,
        })
    }

    pub fn image(&self) -> Option<ImageRect> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::Image { rect } => Some(*rect),
            DrawCommand::Text { .. } => None,
        })
    }
}

/// Owns the page sequence. Pages go `Empty → Accumulating` on the first draw
/// and are finalized (appended, never touched again) on a break or at the end.
pub(super) struct DocumentWriter {
    pages: Vec<Page>,
    current: Page,
    state: PageState,
}

impl DocumentWriter {
    pub(super) fn new() -> Self {
        DocumentWriter {
            pages: Vec::new(),
            current: Page::default(),
            state: PageState::Empty,
        }
    }

    pub(super) fn state(&self) -> PageState {
        self.state
    }

    /// Number of finalized pages plus the one in progress.
    pub(super) fn page_number(&self) -> usize {
        self.pages.len() + 1
    }

    /// Finalize the page in progress (if it has content) and start an empty one.
    pub(super) fn open_page(&mut self) {
        if self.state == PageState::Accumulating {
            self.finalize_page();
        }
    }

    pub(super) fn draw_text(&mut self, x: f32, y: f32, text: &str, style: TextStyle, font_size: f32) {
        self.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            style,
            font_size,
        });
    }

    pub(super) fn draw_image(&mut self, rect: ImageRect) {
        self.push(DrawCommand::Image { rect });
    }

    fn push(&mut self, cmd: DrawCommand) {
        self.current.commands.push(cmd);
        self.state = PageState::Accumulating;
    }

    pub(super) fn finalize_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.state = PageState::Empty;
    }

    /// Finalize whatever is in progress and hand out the page sequence. An
    /// empty trailing page is dropped unless it would be the only one.
    pub(super) fn finish(mut self) -> Vec<Page> {
        if self.state == PageState::Accumulating || self.pages.is_empty() {
            self.finalize_page();
        }
        self.pages
    }

    /// Finish the document, serialize it with `serialize` and write the result
    /// to `path` in one go. Nothing is written if serialization fails.
    pub(super) fn save(
        self,
        path: &Path,
        serialize: impl FnOnce(&[Page]) -> Result<Vec<u8>, Error>,
    ) -> Result<usize, Error> {
        let pages = self.finish();
        let bytes = serialize(&pages)?;
        std::fs::write(path, &bytes).map_err(Error::Io)?;
        Ok(bytes.len())
    }
}
