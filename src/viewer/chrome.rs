//! Navigation chrome (top bar and thumbnail strip) visibility

use std::time::Duration;

use super::layout::THUMBNAIL_CELL_SIZE;

/// Duration of the show/hide slide
pub const CHROME_ANIMATION: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromeVisibility {
    #[default]
    Visible,
    Hidden,
}

/// Events that move the chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeEvent {
    /// Single tap on a page
    PageTapped,
    /// Pager finished decelerating
    ScrollEnded,
}

impl ChromeVisibility {
    /// State after `event`. Taps toggle; scroll end always hides.
    #[must_use]
    pub fn next(self, event: ChromeEvent) -> Self {
        match (event, self) {
            (ChromeEvent::PageTapped, Self::Visible) => Self::Hidden,
            (ChromeEvent::PageTapped, Self::Hidden) => Self::Visible,
            (ChromeEvent::ScrollEnded, _) => Self::Hidden,
        }
    }

    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

/// Heights of the chrome bars
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeMetrics {
    pub nav_height: f32,
    /// Zero when the thumbnail strip is disabled
    pub strip_height: f32,
}

/// Constraint offsets the host applies for a visibility state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeLayout {
    /// Top of the navigation bar relative to the top edge
    pub nav_top: f32,
    /// Bottom of the thumbnail strip relative to the bottom edge
    pub strip_bottom: f32,
}

impl ChromeMetrics {
    #[must_use]
    pub fn layout(&self, visibility: ChromeVisibility) -> ChromeLayout {
        match visibility {
            ChromeVisibility::Visible => ChromeLayout {
                nav_top: 0.0,
                strip_bottom: 0.0,
            },
            ChromeVisibility::Hidden => ChromeLayout {
                nav_top: -self.nav_height,
                strip_bottom: -self.strip_height,
            },
        }
    }
}

impl Default for ChromeMetrics {
    fn default() -> Self {
        Self {
            nav_height: 64.0,
            strip_height: THUMBNAIL_CELL_SIZE.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_toggles() {
        assert_eq!(
            ChromeVisibility::Visible.next(ChromeEvent::PageTapped),
            ChromeVisibility::Hidden
        );
        assert_eq!(
            ChromeVisibility::Hidden.next(ChromeEvent::PageTapped),
            ChromeVisibility::Visible
        );
    }

    #[test]
    fn scroll_end_always_hides() {
        for state in [ChromeVisibility::Visible, ChromeVisibility::Hidden] {
            assert_eq!(state.next(ChromeEvent::ScrollEnded), ChromeVisibility::Hidden);
        }
    }

    #[test]
    fn hidden_layout_slides_bars_offscreen() {
        let metrics = ChromeMetrics {
            nav_height: 64.0,
            strip_height: 0.0,
        };
        let hidden = metrics.layout(ChromeVisibility::Hidden);
        assert_eq!(hidden.nav_top, -64.0);
        assert_eq!(hidden.strip_bottom, 0.0);

        let shown = metrics.layout(ChromeVisibility::Visible);
        assert_eq!(shown.nav_top, 0.0);
    }

    #[test]
    fn default_strip_height_matches_cell_height() {
        let hidden = ChromeMetrics::default().layout(ChromeVisibility::Hidden);
        assert_eq!(hidden.strip_bottom, -THUMBNAIL_CELL_SIZE.height);
    }
}
