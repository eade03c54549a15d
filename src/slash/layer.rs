//! Floating layer geometry and the terminal overlay

/// A rectangle in terminal cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// Zero-area rectangle at the origin, used when no anchor is available
    pub const ZERO: Rect = Rect { x: 0, y: 0, width: 0, height: 0 };

    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x && col < self.right() && row >= self.y && row < self.bottom()
    }
}

/// Something that can report where the popup should be anchored.
///
/// Returning `None` means the geometry is currently unavailable.
pub trait AnchorSource {
    fn anchor_rect(&self) -> Option<Rect>;
}

impl AnchorSource for Rect {
    fn anchor_rect(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl<F> AnchorSource for F
where
    F: Fn() -> Option<Rect>,
{
    fn anchor_rect(&self) -> Option<Rect> {
        self()
    }
}

/// Resolve an anchor, falling back to [`Rect::ZERO`]
pub fn resolve_anchor<A: AnchorSource + ?Sized>(source: &A) -> Rect {
    source.anchor_rect().unwrap_or(Rect::ZERO)
}

/// A positioned overlay owned by one popup session
pub trait FloatingLayer {
    fn reposition(&mut self, anchor: Rect);
    fn hide(&mut self);
    fn destroy(&mut self);
}

/// Creates floating layers; a mounted layer is visible immediately
pub trait LayerHost {
    type Layer: FloatingLayer;

    fn mount(&mut self, anchor: Rect) -> Self::Layer;
}

/// Overlay drawn by the terminal renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub anchor: Rect,
    pub visible: bool,
}

impl Overlay {
    /// Frame for a menu of `rows` x `width` (border included), placed below
    /// the anchor's start. Flips above the anchor when it would overflow
    /// `bounds`, then clamps to `bounds`.
    pub fn frame(&self, rows: u16, width: u16, bounds: Rect) -> Rect {
        let height = rows.saturating_add(2).min(bounds.height);
        let width = width.min(bounds.width);

        let below = self.anchor.bottom();
        let y = if below.saturating_add(height) <= bounds.bottom() {
            below
        } else if self.anchor.y >= bounds.y.saturating_add(height) {
            self.anchor.y - height
        } else {
            bounds.bottom().saturating_sub(height)
        };

        let x = self.anchor.x.min(bounds.right().saturating_sub(width)).max(bounds.x);
        Rect::new(x, y.max(bounds.y), width, height)
    }
}

impl FloatingLayer for Overlay {
    fn reposition(&mut self, anchor: Rect) {
        self.anchor = anchor;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn destroy(&mut self) {
        self.visible = false;
    }
}

/// Mounts [`Overlay`]s for the terminal renderer
#[derive(Debug, Default)]
pub struct OverlayHost;

impl LayerHost for OverlayHost {
    type Layer = Overlay;

    fn mount(&mut self, anchor: Rect) -> Overlay {
        Overlay { anchor, visible: true }
    }
}
