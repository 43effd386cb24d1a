//! Host page boundary — the engine's only view of the outside world.
//!
//! The embedding application implements [`HostPage`] over whatever it
//! renders (a real DOM, a terminal document, a test fixture) and feeds the
//! engine the input event types below.  Nothing under [`crate::core`]
//! depends on a concrete platform.

/// Index identifying one element of the host page.  Stable for the lifetime
/// of the element, cheap to copy and hash — cache keys use it directly.
pub type ElementId = usize;

/// Computed vertical overflow style of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Auto,
    Scroll,
}

impl Overflow {
    /// Whether this style lets the element act as a scroll container.
    pub fn is_scrollable(self) -> bool {
        matches!(self, Overflow::Auto | Overflow::Scroll)
    }
}

// ───────────────────────────────────────── host interface ────

/// Everything the engine needs from the embedding page: element geometry,
/// ancestry, computed style, scroll mutation, and a few affordance hooks.
///
/// Geometry is in pixels (or whatever unit the host scrolls in — the engine
/// only adds and compares).  The hooks with default no-op bodies are
/// optional; hosts without the corresponding capability simply skip them.
pub trait HostPage {
    /// The document root (`html`).
    fn root(&self) -> ElementId;
    /// The document body — scrolling it goes through [`Self::scroll_window_by`].
    fn body(&self) -> ElementId;
    /// Parent element, `None` at the root.
    fn parent(&self, el: ElementId) -> Option<ElementId>;

    /// Visible inner height of `el`.
    fn client_height(&self, el: ElementId) -> f64;
    /// Total content height of `el`.
    fn scroll_height(&self, el: ElementId) -> f64;
    /// Layout height of `el` including borders.
    fn offset_height(&self, el: ElementId) -> f64;
    /// Current vertical scroll offset of `el`.
    fn scroll_top(&self, el: ElementId) -> f64;
    /// Current horizontal scroll offset of `el`.
    fn scroll_left(&self, el: ElementId) -> f64;
    /// Computed `overflow-y` of `el`.
    fn overflow_y(&self, el: ElementId) -> Overflow;
    /// Height of the window's visible area.
    fn viewport_height(&self) -> f64;

    /// Adjust `el`'s scroll offsets by a delta; the host clamps.
    fn scroll_element_by(&mut self, el: ElementId, dx: f64, dy: f64);
    /// Adjust the window's scroll position by a delta; the host clamps.
    fn scroll_window_by(&mut self, dx: f64, dy: f64);

    /// `true` for text-editing contexts: input, textarea, select, embed,
    /// or any `contenteditable` element.
    fn is_editable(&self, el: ElementId) -> bool;
    /// `true` for plain text-entry fields (input, textarea) — the subset
    /// that middle-click paste targets.
    fn is_text_entry(&self, el: ElementId) -> bool;
    /// `true` for button elements (Space must keep activating them).
    fn is_button(&self, el: ElementId) -> bool;
    /// `true` for anchor elements (middle-click opens links).
    fn is_anchor(&self, el: ElementId) -> bool;

    /// Whether the page is embedded in a frame rather than the top window.
    fn is_frame(&self) -> bool {
        false
    }
    /// Whether the platform convention binds middle-click to paste.
    fn middle_click_pastes(&self) -> bool {
        false
    }
    /// Whether the document matches an exclusion selector.
    fn matches_excluded(&self, selector: &str) -> bool {
        let _ = selector;
        false
    }

    /// Show the drag-scroll reference indicator at the cursor's window
    /// coordinates; centering an icon on that point is the host's business.
    fn show_drag_anchor(&mut self, x: f64, y: f64);
    /// Remove the drag-scroll reference indicator.
    fn hide_drag_anchor(&mut self);

    /// Pin the document height to its content height (the 100%-height
    /// layout quirk leaves no scrollable region otherwise).
    fn pin_document_height(&mut self) {}
    /// Start observing layout mutations, re-pinning the document height
    /// when content changes.  Called at most once, after
    /// [`Self::pin_document_height`].
    fn watch_layout(&mut self) {}
    /// Switch fixed background attachments to scrolling ones.
    fn set_background_fixed(&mut self, fixed: bool) {
        let _ = fixed;
    }
}

// ───────────────────────────────────────── input events ──────

/// One wheel tick as delivered by the host.  `wheel_delta_x/y` are the
/// per-axis deltas (positive = content up, wheel convention); hosts that
/// only have the legacy scalar put it in `wheel_delta` and leave the axis
/// fields zero.
#[derive(Debug, Clone, Copy)]
pub struct WheelEvent {
    pub target: ElementId,
    pub wheel_delta_x: f64,
    pub wheel_delta_y: f64,
    /// Legacy single-axis delta, used when both axis fields are zero.
    pub wheel_delta: f64,
    /// The host (or another handler) already claimed this event.
    pub default_prevented: bool,
}

/// Keys the engine reacts to.  Everything else is [`ScrollKey::Other`],
/// which never scrolls but still terminates a drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollKey {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Space,
    Other,
}

/// A key press as delivered by the host.
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub target: ElementId,
    pub key: ScrollKey,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub default_prevented: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// A mouse press, move, or release in window coordinates.
#[derive(Debug, Clone, Copy)]
pub struct MouseEvent {
    pub target: ElementId,
    pub button: MouseButton,
    pub client_x: f64,
    pub client_y: f64,
}
