use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Below this width open menu accordions are collapsed.
pub const MENU_COLLAPSE_WIDTH: u32 = 768;
/// Below this width the sidebar is forced into its toggled (narrow) form.
pub const SIDEBAR_AUTO_TOGGLE_WIDTH: u32 = 480;
/// Scroll distance after which the scroll-to-top control is shown.
pub const SCROLL_TOP_THRESHOLD: u32 = 100;
/// Pixels moved per wheel notch over a fixed sidebar.
pub const SIDEBAR_WHEEL_STEP: i32 = 30;
pub const SMOOTH_SCROLL_MS: u32 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChromeState {
    pub sidebar_toggled: bool,
    pub menus_collapsed: bool,
    pub scroll_to_top_visible: bool,
    /// Scroll offset of a fixed sidebar, moved by wheel events.
    #[serde(default)]
    pub sidebar_scroll_top: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChromeEvent {
    ToggleClicked,
    Resized { width: u32 },
    Scrolled { distance: u32 },
    Wheel { width: u32, delta: i32 },
}

impl ChromeState {
    pub fn apply(self, event: ChromeEvent) -> Self {
        let mut next = self;
        match event {
            ChromeEvent::ToggleClicked => {
                next.sidebar_toggled = !self.sidebar_toggled;
                if next.sidebar_toggled {
                    next.menus_collapsed = true;
                }
            }
            ChromeEvent::Resized { width } => {
                if width < MENU_COLLAPSE_WIDTH {
                    next.menus_collapsed = true;
                }
                if width < SIDEBAR_AUTO_TOGGLE_WIDTH && !self.sidebar_toggled {
                    next.sidebar_toggled = true;
                    next.menus_collapsed = true;
                }
            }
            ChromeEvent::Scrolled { distance } => {
                next.scroll_to_top_visible = distance > SCROLL_TOP_THRESHOLD;
            }
            ChromeEvent::Wheel { width, delta } => {
                if let Some(step) = sidebar_wheel_step(width, delta) {
                    next.sidebar_scroll_top = (self.sidebar_scroll_top + step).max(0);
                }
            }
        }
        next
    }
}

/// Scroll offset for one wheel event over a fixed sidebar, or `None` when the
/// viewport is narrow enough that the page scrolls normally.
pub fn sidebar_wheel_step(width: u32, delta: i32) -> Option<i32> {
    if width <= MENU_COLLAPSE_WIDTH {
        return None;
    }
    Some(if delta < 0 { SIDEBAR_WHEEL_STEP } else { -SIDEBAR_WHEEL_STEP })
}

/// easeInOutExpo over `t` in `[0, 1]`.
pub fn ease_in_out_expo(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    if t < 0.5 {
        2f64.powf(20.0 * t - 10.0) / 2.0
    } else {
        (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
    }
}

/// Position of an animated scroll from `from` to `to` after `elapsed_ms`.
pub fn smooth_scroll_position(from: f64, to: f64, elapsed_ms: u32) -> f64 {
    let t = f64::from(elapsed_ms.min(SMOOTH_SCROLL_MS)) / f64::from(SMOOTH_SCROLL_MS);
    from + (to - from) * ease_in_out_expo(t)
}

/// Positions sampled at `frames + 1` evenly spaced instants of the animation,
/// first and last included.
pub fn scroll_frames(from: f64, to: f64, frames: u32) -> Vec<f64> {
    let frames = frames.max(1);
    (0..=frames)
        .map(|i| {
            let elapsed = (u64::from(SMOOTH_SCROLL_MS) * u64::from(i) / u64::from(frames)) as u32;
            smooth_scroll_position(from, to, elapsed)
        })
        .collect()
}
