/// Geometry and vertical write position for the page being filled. PDF user
/// space: y grows upward, so writing moves the cursor down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutState {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub y: f32,
    pub font_size: f32,
    pub leading: f32,
}

#[derive(Debug)]
pub(super) struct PageCursor {
    state: LayoutState,
}

impl PageCursor {
    pub(super) fn new(
        page_width: f32,
        page_height: f32,
        margin: f32,
        font_size: f32,
        leading: f32,
    ) -> Self {
        PageCursor {
            state: LayoutState {
                page_width,
                page_height,
                margin,
                y: page_height - margin,
                font_size,
                leading,
            },
        }
    }

    pub(super) fn position(&self) -> f32 {
        self.state.y
    }

    pub(super) fn state(&self) -> &LayoutState {
        &self.state
    }

    pub(super) fn top(&self) -> f32 {
        self.state.page_height - self.state.margin
    }

    pub(super) fn bottom(&self) -> f32 {
        self.state.margin
    }

    pub(super) fn printable_height(&self) -> f32 {
        self.top() - self.bottom()
    }

    pub(super) fn is_at_top(&self) -> bool {
        self.state.y >= self.top()
    }

    pub(super) fn fits(&self, block_height: f32) -> bool {
        self.state.y - block_height >= self.state.margin
    }

    pub(super) fn advance(&mut self, amount: f32) {
        self.state.y -= amount;
    }

    /// Advance, but never past the bottom margin.
    pub(super) fn advance_clamped(&mut self, amount: f32) {
        self.state.y = (self.state.y - amount).max(self.state.margin);
    }

    pub(super) fn reset(&mut self) {
        self.state.y = self.top();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter() -> PageCursor {
        PageCursor::new(612.0, 792.0, 72.0, 12.0, 14.0)
    }

    #[test]
    fn starts_at_top_margin() {
        let c = letter();
        assert_eq!(c.position(), 720.0);
        assert!(c.is_at_top());
        assert_eq!(c.printable_height(), 648.0);
    }

    #[test]
    fn fits_is_inclusive_at_margin() {
        let mut c = letter();
        c.advance(634.0);
        assert_eq!(c.position(), 86.0);
        assert!(c.fits(14.0));
        assert!(!c.fits(14.5));
    }

    #[test]
    fn reset_restores_top() {
        let mut c = letter();
        c.advance(300.0);
        assert!(!c.is_at_top());
        c.reset();
        assert_eq!(c.position(), 720.0);
    }

    #[test]
    fn clamped_advance_stops_at_margin() {
        let mut c = letter();
        c.advance(640.0);
        c.advance_clamped(20.0);
        assert_eq!(c.position(), 72.0);
        assert_eq!(c.state().y, c.bottom());
    }
}
