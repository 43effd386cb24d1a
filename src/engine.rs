//! Engine orchestration — one instantiable controller per page context.
//!
//! All mutable scrolling state lives here so the embedder owns exactly one
//! object: feed it input events, tick it every frame while
//! [`SmoothScroll::needs_frame`] holds, and call
//! [`SmoothScroll::teardown`] when the page goes away.

use std::time::Instant;

use crate::config::ScrollConfig;
use crate::core::animator::{FrameScroll, ScrollAnimator, ScrollTarget};
use crate::core::classify::{self, DeltaTracker, KeyContext};
use crate::core::drag::DragScroll;
use crate::core::overflow::OverflowResolver;
use crate::host::{ElementId, HostPage, KeyEvent, MouseButton, MouseEvent, ScrollKey, WheelEvent};

/// What the engine decided about an input event.  On [`Handled::Pass`] the
/// embedder must let the platform's default behavior proceed; on
/// [`Handled::Consumed`] it must suppress it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Consumed,
    Pass,
}

/// The smooth-scrolling controller for one page.
#[derive(Debug)]
pub struct SmoothScroll<H: HostPage> {
    host: H,
    cfg: ScrollConfig,
    animator: ScrollAnimator,
    resolver: OverflowResolver,
    deltas: DeltaTracker,
    drag: DragScroll,
    /// Keyboard scroll origin: the last mousedown target, initially body.
    active_element: ElementId,
    init_done: bool,
    /// Document matched the exclusion selector; wheel and keyboard
    /// handling stay off.
    excluded: bool,
}

impl<H: HostPage> SmoothScroll<H> {
    pub fn new(host: H, cfg: ScrollConfig) -> Self {
        let active_element = host.body();
        Self {
            animator: ScrollAnimator::new(&cfg),
            resolver: OverflowResolver::new(),
            deltas: DeltaTracker::default(),
            drag: DragScroll::new(),
            active_element,
            init_done: false,
            excluded: false,
            host,
            cfg,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.cfg
    }

    /// Whether the embedder should keep scheduling frame ticks.
    pub fn needs_frame(&self) -> bool {
        self.animator.is_pending() || self.drag.is_active()
    }

    // ── initialization ──────────────────────────────────────────

    /// One-time page setup.  Runs lazily before the first wheel event if
    /// the embedder never calls it explicitly on load.
    pub fn init(&mut self) {
        if self.init_done {
            return;
        }
        self.init_done = true;

        self.excluded =
            !self.cfg.excluded.is_empty() && self.host.matches_excluded(&self.cfg.excluded);

        // 100%-height layouts can leave the page without a scrollable
        // region even though content overflows the viewport: the body
        // scrolls but neither body nor root report a real height.  Pin the
        // document height and have the host re-pin as content mutates.
        // Only meaningful in the top window, not inside a frame.
        let body = self.host.body();
        let root = self.host.root();
        let viewport = self.host.viewport_height();
        if !self.host.is_frame()
            && self.host.scroll_height(body) > viewport
            && (self.host.offset_height(body) <= viewport
                || self.host.offset_height(root) <= viewport)
        {
            self.host.pin_document_height();
            self.host.watch_layout();
        }

        if !self.cfg.fixed_background && !self.excluded {
            self.host.set_background_fixed(false);
        }

        tracing::debug!(excluded = self.excluded, "smooth scroll initialized");
    }

    /// Release everything transient: pending commands, cached overflow
    /// answers, any drag session and its indicator.
    pub fn teardown(&mut self) {
        self.animator.clear();
        self.resolver.clear();
        if self.drag.end() {
            self.host.hide_drag_anchor();
        }
        self.init_done = false;
    }

    // ── wheel ───────────────────────────────────────────────────

    pub fn on_wheel(&mut self, ev: WheelEvent, now: Instant) -> Handled {
        if ev.default_prevented {
            return Handled::Pass;
        }
        self.init();
        if self.excluded {
            return Handled::Pass;
        }

        // Use default scrolling when there is no overflowing element.
        let Some(target) = self.resolver.resolve(&self.host, ev.target, now) else {
            return Handled::Pass;
        };

        let (mut dx, mut dy) = classify::wheel_deltas(&ev);

        if !self.cfg.touchpad_support && self.deltas.is_touchpad(dy) {
            tracing::trace!("touchpad input ignored");
            return Handled::Pass;
        }

        dx = classify::scale_delta(dx, self.cfg.step_size);
        dy = classify::scale_delta(dy, self.cfg.step_size);

        // Wheel deltas are positive-up; scroll deltas positive-down.
        self.animator
            .enqueue(&self.cfg, self.scroll_target(target), -dx, -dy, now);
        Handled::Consumed
    }

    // ── keyboard ────────────────────────────────────────────────

    pub fn on_key_down(&mut self, ev: KeyEvent, now: Instant) -> Handled {
        // Any key press terminates a drag session.
        if self.drag.end() {
            self.host.hide_drag_anchor();
        }

        if !self.cfg.keyboard_support || self.excluded {
            return Handled::Pass;
        }

        // Leave the key alone while the user is editing text or holding a
        // modifier (Shift only matters for Space).
        let modifier = ev.ctrl || ev.alt || ev.meta || (ev.shift && ev.key != ScrollKey::Space);
        if ev.default_prevented || modifier || self.host.is_editable(ev.target) {
            return Handled::Pass;
        }
        // Space on a button must keep activating it.
        if ev.key == ScrollKey::Space && self.host.is_button(ev.target) {
            return Handled::Pass;
        }

        let Some(elem) = self.resolver.resolve(&self.host, self.active_element, now) else {
            return Handled::Pass;
        };
        let body = self.host.body();
        let ctx = KeyContext {
            client_height: if elem == body {
                self.host.viewport_height()
            } else {
                self.host.client_height(elem)
            },
            scroll_top: self.host.scroll_top(elem),
            scroll_height: self.host.scroll_height(elem),
        };

        let Some((x, y)) = classify::key_deltas(ev.key, ev.shift, ctx, &self.cfg) else {
            return Handled::Pass;
        };

        self.animator
            .enqueue(&self.cfg, self.scroll_target(elem), x, y, now);
        Handled::Consumed
    }

    // ── mouse / drag ────────────────────────────────────────────

    pub fn on_mouse_down(&mut self, ev: MouseEvent, now: Instant) -> Handled {
        // Track the keyboard scroll origin on every press.
        self.active_element = ev.target;

        // A press during an active session only terminates it; the next
        // press may start a fresh one.
        if self.drag.is_active() {
            self.drag.end();
            self.host.hide_drag_anchor();
            return match self.qualify_drag(&ev, now) {
                Some(_) => Handled::Consumed,
                None => Handled::Pass,
            };
        }

        let Some(target) = self.qualify_drag(&ev, now) else {
            return Handled::Pass;
        };

        self.drag.begin(target, ev.client_x, ev.client_y, now);
        self.host.show_drag_anchor(ev.client_x, ev.client_y);
        tracing::debug!(element = target, "drag scroll session started");
        Handled::Consumed
    }

    pub fn on_mouse_move(&mut self, ev: MouseEvent) {
        self.drag.on_move(ev.client_x, ev.client_y);
    }

    pub fn on_mouse_up(&mut self, _ev: MouseEvent) {
        if self.drag.on_up() {
            self.host.hide_drag_anchor();
            tracing::debug!("drag scroll session ended");
        }
    }

    /// Whether a middle press may start drag scrolling: the mode is on,
    /// the press is not claimed by paste or link conventions, and a target
    /// with real overflow resolves.
    fn qualify_drag(&mut self, ev: &MouseEvent, now: Instant) -> Option<ElementId> {
        if ev.button != MouseButton::Middle || !self.cfg.middle_mouse {
            return None;
        }
        // Middle click pastes into text fields on some platforms.
        if self.host.middle_click_pastes() && self.host.is_text_entry(ev.target) {
            return None;
        }
        // Middle click on (or inside) a link opens it.
        let mut el = Some(ev.target);
        while let Some(cur) = el {
            if self.host.is_anchor(cur) {
                return None;
            }
            el = self.host.parent(cur);
        }

        let target = self.resolver.resolve(&self.host, ev.target, now)?;
        // The cached answer may be stale; re-check that it still overflows.
        if self.host.client_height(target) == self.host.scroll_height(target) {
            return None;
        }
        Some(target)
    }

    // ── frame tick ──────────────────────────────────────────────

    /// Advance animations to `now`.  Returns whether more frames are
    /// wanted; the embedder stops scheduling once this goes false.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        if let Some(frame) = self.animator.tick(&self.cfg, now) {
            self.apply(frame);
        }
        if let Some((el, dx, dy)) = self.drag.tick(now) {
            if dx != 0 || dy != 0 {
                self.host.scroll_element_by(el, f64::from(dx), f64::from(dy));
            }
        }
        self.needs_frame()
    }

    fn apply(&mut self, frame: FrameScroll) {
        if frame.dx == 0 && frame.dy == 0 {
            return;
        }
        match frame.target {
            ScrollTarget::Window => self
                .host
                .scroll_window_by(f64::from(frame.dx), f64::from(frame.dy)),
            ScrollTarget::Element(el) => {
                self.host
                    .scroll_element_by(el, f64::from(frame.dx), f64::from(frame.dy));
            }
        }
    }

    /// Body scrolls through the window scroller; everything else scrolls
    /// its own offsets.
    fn scroll_target(&self, el: ElementId) -> ScrollTarget {
        if el == self.host.body() {
            ScrollTarget::Window
        } else {
            ScrollTarget::Element(el)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::host::Overflow;
    use crate::page::{Document, Element, Tag};

    /// A body-sized scrollable pane with 1000px of content.
    /// Returns (engine, pane).
    fn pane_engine(cfg: ScrollConfig) -> (SmoothScroll<Document>, ElementId) {
        let mut doc = Document::new(80.0, 400.0);
        let pane = doc.insert(
            doc.body(),
            Element::new(Tag::Div)
                .sized(80.0, 400.0)
                .content(80.0, 1000.0)
                .overflow_y(Overflow::Auto),
        );
        (SmoothScroll::new(doc, cfg), pane)
    }

    fn wheel(target: ElementId, delta_y: f64) -> WheelEvent {
        WheelEvent {
            target,
            wheel_delta_x: 0.0,
            wheel_delta_y: delta_y,
            wheel_delta: 0.0,
            default_prevented: false,
        }
    }

    fn key(target: ElementId, key: ScrollKey) -> KeyEvent {
        KeyEvent {
            target,
            key,
            shift: false,
            ctrl: false,
            alt: false,
            meta: false,
            default_prevented: false,
        }
    }

    fn middle(target: ElementId, x: f64, y: f64) -> MouseEvent {
        MouseEvent {
            target,
            button: MouseButton::Middle,
            client_x: x,
            client_y: y,
        }
    }

    /// Left press on `el`, making it the keyboard scroll origin.
    fn focus(engine: &mut SmoothScroll<Document>, el: ElementId, now: Instant) {
        engine.on_mouse_down(
            MouseEvent {
                target: el,
                button: MouseButton::Left,
                client_x: 0.0,
                client_y: 0.0,
            },
            now,
        );
    }

    /// Drive frames in 16ms steps until the engine goes idle.
    fn settle(engine: &mut SmoothScroll<Document>, from: Instant) {
        let mut t = from;
        for _ in 0..200 {
            t += Duration::from_millis(16);
            if !engine.on_frame(t) {
                break;
            }
        }
    }

    #[test]
    fn wheel_notch_scrolls_the_pane_by_one_step() {
        let (mut engine, pane) = pane_engine(ScrollConfig::default());
        let t0 = Instant::now();

        assert_eq!(engine.on_wheel(wheel(pane, -120.0), t0), Handled::Consumed);
        assert!(engine.needs_frame());
        settle(&mut engine, t0);

        assert_eq!(engine.host().scroll_top(pane), 120.0);
        assert!(!engine.needs_frame());
    }

    #[test]
    fn wheel_without_overflow_passes_through() {
        let doc = Document::new(80.0, 400.0);
        let body = doc.body();
        let mut engine = SmoothScroll::new(doc, ScrollConfig::default());
        assert_eq!(engine.on_wheel(wheel(body, -120.0), Instant::now()), Handled::Pass);
        assert!(!engine.needs_frame());
    }

    #[test]
    fn prevented_wheel_is_left_alone() {
        let (mut engine, pane) = pane_engine(ScrollConfig::default());
        let mut ev = wheel(pane, -120.0);
        ev.default_prevented = true;
        assert_eq!(engine.on_wheel(ev, Instant::now()), Handled::Pass);
    }

    #[test]
    fn touchpad_input_passes_when_support_is_off() {
        let mut cfg = ScrollConfig::default();
        cfg.touchpad_support = false;
        let (mut engine, pane) = pane_engine(cfg);
        let t0 = Instant::now();

        // Jittery magnitudes → touchpad → native scrolling.
        engine.on_wheel(wheel(pane, -17.0), t0);
        engine.on_wheel(wheel(pane, -33.0), t0);
        assert_eq!(engine.on_wheel(wheel(pane, -29.0), t0), Handled::Pass);
    }

    #[test]
    fn body_scrolls_through_the_window() {
        let mut doc = Document::new(80.0, 400.0);
        doc.element_mut(doc.body()).content_height = 1000.0;
        doc.element_mut(doc.body()).overflow_y = Overflow::Auto;
        let body = doc.body();
        let mut engine = SmoothScroll::new(doc, ScrollConfig::default());
        let t0 = Instant::now();

        assert_eq!(engine.on_wheel(wheel(body, -120.0), t0), Handled::Consumed);
        settle(&mut engine, t0);
        assert_eq!(engine.host().scroll_top(body), 120.0);
    }

    #[test]
    fn end_key_reaches_the_bottom() {
        let (mut engine, pane) = pane_engine(ScrollConfig::default());
        let t0 = Instant::now();
        engine.host_mut().element_mut(pane).scroll_top = 200.0;

        // Keyboard scrolling follows the last mousedown target.
        focus(&mut engine, pane, t0);
        assert_eq!(engine.on_key_down(key(pane, ScrollKey::End), t0), Handled::Consumed);
        settle(&mut engine, t0);

        // 1000 - 200 - 400 + 10 = 410, clamped to the 600px range.
        assert_eq!(engine.host().scroll_top(pane), 600.0);
    }

    #[test]
    fn keys_in_editable_contexts_pass() {
        let (mut engine, pane) = pane_engine(ScrollConfig::default());
        let input = engine
            .host_mut()
            .insert(pane, Element::new(Tag::Input).sized(40.0, 1.0));
        assert_eq!(
            engine.on_key_down(key(input, ScrollKey::Down), Instant::now()),
            Handled::Pass
        );
    }

    #[test]
    fn modified_keys_pass_except_shift_space() {
        let (mut engine, pane) = pane_engine(ScrollConfig::default());
        let t0 = Instant::now();
        focus(&mut engine, pane, t0);

        let mut ev = key(pane, ScrollKey::Down);
        ev.ctrl = true;
        assert_eq!(engine.on_key_down(ev, t0), Handled::Pass);

        let mut ev = key(pane, ScrollKey::Up);
        ev.shift = true;
        assert_eq!(engine.on_key_down(ev, t0), Handled::Pass);

        let mut ev = key(pane, ScrollKey::Space);
        ev.shift = true;
        assert_eq!(engine.on_key_down(ev, t0), Handled::Consumed);
    }

    #[test]
    fn space_on_a_button_keeps_activating_it() {
        let (mut engine, pane) = pane_engine(ScrollConfig::default());
        let t0 = Instant::now();
        let button = engine
            .host_mut()
            .insert(pane, Element::new(Tag::Button).sized(10.0, 1.0));
        focus(&mut engine, pane, t0);
        assert_eq!(engine.on_key_down(key(button, ScrollKey::Space), t0), Handled::Pass);
        assert_eq!(engine.on_key_down(key(button, ScrollKey::Down), t0), Handled::Consumed);
    }

    #[test]
    fn drag_session_scrolls_while_frames_pass() {
        let (mut engine, pane) = pane_engine(ScrollConfig::default());
        let t0 = Instant::now();

        assert_eq!(engine.on_mouse_down(middle(pane, 40.0, 200.0), t0), Handled::Consumed);
        assert!(engine.host().drag_anchor().is_some());
        assert!(engine.needs_frame());

        // 100px below the reference → 1 px/ms downward.
        engine.on_mouse_move(middle(pane, 40.0, 300.0));
        engine.on_frame(t0 + Duration::from_millis(50));
        assert_eq!(engine.host().scroll_top(pane), 50.0);

        engine.on_mouse_up(middle(pane, 40.0, 300.0));
        assert!(engine.host().drag_anchor().is_none());
        assert!(!engine.needs_frame());
    }

    #[test]
    fn middle_press_on_a_link_passes() {
        let (mut engine, pane) = pane_engine(ScrollConfig::default());
        let anchor = engine
            .host_mut()
            .insert(pane, Element::new(Tag::Anchor).sized(10.0, 1.0));
        assert_eq!(
            engine.on_mouse_down(middle(anchor, 0.0, 0.0), Instant::now()),
            Handled::Pass
        );
        assert!(engine.host().drag_anchor().is_none());
    }

    #[test]
    fn middle_press_in_a_text_field_pastes_on_paste_platforms() {
        let (mut engine, pane) = pane_engine(ScrollConfig::default());
        engine.host_mut().set_middle_click_pastes(true);
        let field = engine
            .host_mut()
            .insert(pane, Element::new(Tag::Textarea).sized(40.0, 4.0));
        assert_eq!(
            engine.on_mouse_down(middle(field, 0.0, 0.0), Instant::now()),
            Handled::Pass
        );
    }

    #[test]
    fn second_press_terminates_without_restarting() {
        let (mut engine, pane) = pane_engine(ScrollConfig::default());
        let t0 = Instant::now();
        engine.on_mouse_down(middle(pane, 40.0, 200.0), t0);
        assert!(engine.needs_frame());

        engine.on_mouse_down(middle(pane, 40.0, 220.0), t0 + Duration::from_millis(100));
        assert!(!engine.needs_frame());
        assert!(engine.host().drag_anchor().is_none());
    }

    #[test]
    fn key_press_terminates_a_drag_session() {
        let (mut engine, pane) = pane_engine(ScrollConfig::default());
        let t0 = Instant::now();
        engine.on_mouse_down(middle(pane, 40.0, 200.0), t0);
        engine.on_key_down(key(pane, ScrollKey::Other), t0);
        assert!(!engine.needs_frame());
        assert!(engine.host().drag_anchor().is_none());
    }

    #[test]
    fn excluded_document_disables_wheel_and_keys() {
        let mut cfg = ScrollConfig::default();
        cfg.excluded = "#reader".to_string();
        let mut doc = Document::new(80.0, 400.0);
        doc.add_matching_selector("#reader");
        let pane = doc.insert(
            doc.body(),
            Element::new(Tag::Div)
                .sized(80.0, 400.0)
                .content(80.0, 1000.0)
                .overflow_y(Overflow::Auto),
        );
        let mut engine = SmoothScroll::new(doc, cfg);
        engine.init();
        let t0 = Instant::now();

        assert_eq!(engine.on_wheel(wheel(pane, -120.0), t0), Handled::Pass);
        assert_eq!(engine.on_key_down(key(pane, ScrollKey::Down), t0), Handled::Pass);
    }

    #[test]
    fn quirky_layout_gets_its_height_pinned() {
        // Content overflows the viewport but neither body nor root admit
        // to a height above it.
        let mut doc = Document::new(80.0, 400.0);
        doc.element_mut(doc.body()).content_height = 1000.0;
        let mut engine = SmoothScroll::new(doc, ScrollConfig::default());
        engine.init();
        assert!(engine.host().height_pinned());
        assert!(engine.host().layout_watched());
    }

    #[test]
    fn framed_documents_skip_the_height_fix() {
        let mut doc = Document::new(80.0, 400.0);
        doc.element_mut(doc.body()).content_height = 1000.0;
        doc.set_in_frame(true);
        let mut engine = SmoothScroll::new(doc, ScrollConfig::default());
        engine.init();
        assert!(!engine.host().height_pinned());
    }

    #[test]
    fn disabling_fixed_background_reaches_the_host() {
        let mut cfg = ScrollConfig::default();
        cfg.fixed_background = false;
        let (mut engine, _) = pane_engine(cfg);
        engine.init();
        assert!(!engine.host().background_fixed());
    }

    #[test]
    fn teardown_clears_everything_transient() {
        let (mut engine, pane) = pane_engine(ScrollConfig::default());
        let t0 = Instant::now();
        engine.on_wheel(wheel(pane, -120.0), t0);
        engine.on_mouse_down(middle(pane, 40.0, 200.0), t0);

        engine.teardown();
        assert!(!engine.needs_frame());
        assert!(engine.host().drag_anchor().is_none());
    }
}
