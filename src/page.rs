//! In-memory document model — a complete [`HostPage`] implementation.
//!
//! The [`Element`] is the fundamental unit — it holds the tag, computed
//! style, and geometry of a single page element and links to its children
//! via indices into an arena (the [`Document`] struct).  Using an arena
//! avoids recursive `Box` allocations, is cache-friendly, and makes
//! borrowing trivial.  The demo binary renders one of these; the test
//! suite drives the engine against them directly.

use crate::host::{ElementId, HostPage, Overflow};

// ───────────────────────────────────────── element ───────────

/// Element kinds the engine cares about.  Anything else is a `Div`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tag {
    Html,
    Body,
    #[default]
    Div,
    Anchor,
    Input,
    Textarea,
    Select,
    Embed,
    Button,
}

/// One element of the document with its style and geometry.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: Tag,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    /// Computed `overflow-y`.
    pub overflow_y: Overflow,
    /// Visible inner box.
    pub client_width: f64,
    pub client_height: f64,
    /// Total content box; exceeding the client box makes it overflow.
    pub content_width: f64,
    pub content_height: f64,
    /// Layout height including borders.  Defaults to the client height.
    pub offset_height: f64,
    /// Current scroll offsets, clamped to the scrollable range.
    pub scroll_left: f64,
    pub scroll_top: f64,
    /// `contenteditable`.
    pub editable: bool,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            parent: None,
            children: Vec::new(),
            overflow_y: Overflow::Visible,
            client_width: 0.0,
            client_height: 0.0,
            content_width: 0.0,
            content_height: 0.0,
            offset_height: 0.0,
            scroll_left: 0.0,
            scroll_top: 0.0,
            editable: false,
        }
    }

    /// Set the visible box, defaulting content and offset boxes to match.
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.client_width = width;
        self.client_height = height;
        if self.content_width < width {
            self.content_width = width;
        }
        if self.content_height < height {
            self.content_height = height;
        }
        self.offset_height = height;
        self
    }

    /// Set the content box (what `scroll_height`/`scroll_width` report).
    pub fn content(mut self, width: f64, height: f64) -> Self {
        self.content_width = width;
        self.content_height = height;
        self
    }

    pub fn overflow_y(mut self, overflow: Overflow) -> Self {
        self.overflow_y = overflow;
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    /// How far down this element can scroll.
    fn max_scroll_top(&self) -> f64 {
        (self.content_height - self.client_height).max(0.0)
    }

    fn max_scroll_left(&self) -> f64 {
        (self.content_width - self.client_width).max(0.0)
    }
}

// ───────────────────────────────────────── document ──────────

/// Arena-allocated page: `html` root, `body`, and whatever the embedder
/// inserts below them.  Window-level scrolling lands on the body.
#[derive(Debug, Clone)]
pub struct Document {
    pub elements: Vec<Element>,
    root: ElementId,
    body: ElementId,
    viewport_height: f64,
    /// Reference indicator shown while a drag-scroll session is active.
    drag_anchor: Option<(f64, f64)>,
    height_pinned: bool,
    layout_watched: bool,
    background_fixed: bool,
    in_frame: bool,
    middle_click_pastes: bool,
    /// Selectors this document matches (exclusion checks).
    matching_selectors: Vec<String>,
}

impl Document {
    /// Create `html > body`, both spanning the viewport.
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        let html = Element::new(Tag::Html).sized(viewport_width, viewport_height);
        let mut body = Element::new(Tag::Body).sized(viewport_width, viewport_height);
        body.parent = Some(0);
        let mut doc = Self {
            elements: vec![html, body],
            root: 0,
            body: 1,
            viewport_height,
            drag_anchor: None,
            height_pinned: false,
            layout_watched: false,
            background_fixed: true,
            in_frame: false,
            middle_click_pastes: false,
            matching_selectors: Vec::new(),
        };
        doc.elements[0].children.push(1);
        doc
    }

    /// Insert `element` as the last child of `parent`, returning its id.
    pub fn insert(&mut self, parent: ElementId, mut element: Element) -> ElementId {
        let id = self.elements.len();
        element.parent = Some(parent);
        self.elements.push(element);
        self.elements[parent].children.push(id);
        id
    }

    pub fn element(&self, el: ElementId) -> &Element {
        &self.elements[el]
    }

    pub fn element_mut(&mut self, el: ElementId) -> &mut Element {
        &mut self.elements[el]
    }

    /// Where the drag-scroll indicator currently sits, if shown.
    pub fn drag_anchor(&self) -> Option<(f64, f64)> {
        self.drag_anchor
    }

    pub fn height_pinned(&self) -> bool {
        self.height_pinned
    }

    pub fn layout_watched(&self) -> bool {
        self.layout_watched
    }

    pub fn background_fixed(&self) -> bool {
        self.background_fixed
    }

    pub fn set_in_frame(&mut self, in_frame: bool) {
        self.in_frame = in_frame;
    }

    pub fn set_middle_click_pastes(&mut self, pastes: bool) {
        self.middle_click_pastes = pastes;
    }

    /// Declare that this document matches `selector`.
    pub fn add_matching_selector(&mut self, selector: &str) {
        self.matching_selectors.push(selector.to_string());
    }

    /// Resize the viewport, keeping root and body client boxes in sync.
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.viewport_height = height;
        for el in [self.root, self.body] {
            let e = &mut self.elements[el];
            e.client_width = width;
            e.client_height = height;
            e.offset_height = height;
            e.content_width = e.content_width.max(width);
            e.content_height = e.content_height.max(height);
        }
    }
}

impl HostPage for Document {
    fn root(&self) -> ElementId {
        self.root
    }

    fn body(&self) -> ElementId {
        self.body
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.elements[el].parent
    }

    fn client_height(&self, el: ElementId) -> f64 {
        self.elements[el].client_height
    }

    fn scroll_height(&self, el: ElementId) -> f64 {
        self.elements[el].content_height
    }

    fn offset_height(&self, el: ElementId) -> f64 {
        self.elements[el].offset_height
    }

    fn scroll_top(&self, el: ElementId) -> f64 {
        self.elements[el].scroll_top
    }

    fn scroll_left(&self, el: ElementId) -> f64 {
        self.elements[el].scroll_left
    }

    fn overflow_y(&self, el: ElementId) -> Overflow {
        self.elements[el].overflow_y
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_element_by(&mut self, el: ElementId, dx: f64, dy: f64) {
        let e = &mut self.elements[el];
        e.scroll_left = (e.scroll_left + dx).clamp(0.0, e.max_scroll_left());
        e.scroll_top = (e.scroll_top + dy).clamp(0.0, e.max_scroll_top());
    }

    fn scroll_window_by(&mut self, dx: f64, dy: f64) {
        // The window scrolls the root scroller, which is the body here.
        self.scroll_element_by(self.body, dx, dy);
    }

    fn is_editable(&self, el: ElementId) -> bool {
        let e = &self.elements[el];
        e.editable
            || matches!(
                e.tag,
                Tag::Input | Tag::Textarea | Tag::Select | Tag::Embed
            )
    }

    fn is_text_entry(&self, el: ElementId) -> bool {
        matches!(self.elements[el].tag, Tag::Input | Tag::Textarea)
    }

    fn is_button(&self, el: ElementId) -> bool {
        self.elements[el].tag == Tag::Button
    }

    fn is_anchor(&self, el: ElementId) -> bool {
        self.elements[el].tag == Tag::Anchor
    }

    fn is_frame(&self) -> bool {
        self.in_frame
    }

    fn middle_click_pastes(&self) -> bool {
        self.middle_click_pastes
    }

    fn matches_excluded(&self, selector: &str) -> bool {
        self.matching_selectors.iter().any(|s| s == selector)
    }

    fn show_drag_anchor(&mut self, x: f64, y: f64) {
        self.drag_anchor = Some((x, y));
    }

    fn hide_drag_anchor(&mut self) {
        self.drag_anchor = None;
    }

    fn pin_document_height(&mut self) {
        self.height_pinned = true;
        let content = self.elements[self.body].content_height;
        let root = &mut self.elements[self.root];
        root.offset_height = root.offset_height.max(content);
    }

    fn watch_layout(&mut self) {
        self.layout_watched = true;
    }

    fn set_background_fixed(&mut self, fixed: bool) {
        self.background_fixed = fixed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_links_parent_and_children() {
        let mut doc = Document::new(80.0, 24.0);
        let pane = doc.insert(doc.body(), Element::new(Tag::Div).sized(80.0, 24.0));
        assert_eq!(doc.parent(pane), Some(doc.body()));
        assert!(doc.element(doc.body()).children.contains(&pane));
    }

    #[test]
    fn scroll_clamps_to_content_box() {
        let mut doc = Document::new(80.0, 24.0);
        let pane = doc.insert(
            doc.body(),
            Element::new(Tag::Div)
                .sized(80.0, 24.0)
                .content(80.0, 100.0)
                .overflow_y(Overflow::Auto),
        );
        doc.scroll_element_by(pane, 0.0, 1000.0);
        assert_eq!(doc.scroll_top(pane), 76.0);
        doc.scroll_element_by(pane, 0.0, -1000.0);
        assert_eq!(doc.scroll_top(pane), 0.0);
    }

    #[test]
    fn window_scroll_lands_on_body() {
        let mut doc = Document::new(80.0, 24.0);
        doc.element_mut(doc.body()).content_height = 100.0;
        doc.scroll_window_by(0.0, 30.0);
        assert_eq!(doc.scroll_top(doc.body()), 30.0);
    }

    #[test]
    fn editable_covers_tags_and_contenteditable() {
        let mut doc = Document::new(80.0, 24.0);
        let input = doc.insert(doc.body(), Element::new(Tag::Input));
        let div = doc.insert(doc.body(), Element::new(Tag::Div).editable());
        let plain = doc.insert(doc.body(), Element::new(Tag::Div));
        assert!(doc.is_editable(input));
        assert!(doc.is_editable(div));
        assert!(!doc.is_editable(plain));
    }
}
