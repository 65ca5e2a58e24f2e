use crate::coords::Vec2;

/// Primary-button pointer events in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Pressed(Vec2),
    /// Motion; `pressed` tells whether the primary button is held.
    Moved { pos: Vec2, pressed: bool },
    Released(Vec2),
    /// The press ended without a release (focus lost mid-press).
    Cancelled,
}

/// Current pointer state for a single window.
///
/// Button events from the platform carry no position, so the last known
/// position is tracked here.
#[derive(Debug, Default)]
pub struct PointerState {
    pos: Option<Vec2>,
    pressed: bool,
}

impl PointerState {
    pub fn moved(&mut self, pos: Vec2) -> PointerEvent {
        self.pos = Some(pos);
        PointerEvent::Moved {
            pos,
            pressed: self.pressed,
        }
    }

    pub fn left(&mut self) {
        self.pos = None;
    }

    /// Primary button change. `None` when the button state did not change or
    /// the pointer position is unknown.
    pub fn button(&mut self, down: bool) -> Option<PointerEvent> {
        if down == self.pressed {
            return None;
        }
        let pos = self.pos?;
        self.pressed = down;
        Some(if down {
            PointerEvent::Pressed(pos)
        } else {
            PointerEvent::Released(pos)
        })
    }

    /// On focus loss, a held button is released without an event from the
    /// platform; report it as cancelled to avoid a stuck stroke.
    pub fn focus_lost(&mut self) -> Option<PointerEvent> {
        if !self.pressed {
            return None;
        }
        self.pressed = false;
        Some(PointerEvent::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_uses_last_position() {
        let mut st = PointerState::default();
        assert_eq!(st.button(true), None);

        st.moved(Vec2::new(3.0, 4.0));
        assert_eq!(st.button(true), Some(PointerEvent::Pressed(Vec2::new(3.0, 4.0))));
        assert_eq!(
            st.moved(Vec2::new(5.0, 6.0)),
            PointerEvent::Moved { pos: Vec2::new(5.0, 6.0), pressed: true }
        );
        assert_eq!(st.button(true), None);
        assert_eq!(st.button(false), Some(PointerEvent::Released(Vec2::new(5.0, 6.0))));
        assert_eq!(st.button(false), None);
    }

    #[test]
    fn focus_loss_cancels_press() {
        let mut st = PointerState::default();
        assert_eq!(st.focus_lost(), None);

        st.moved(Vec2::new(1.0, 1.0));
        st.button(true);
        assert_eq!(st.focus_lost(), Some(PointerEvent::Cancelled));
        assert_eq!(st.button(false), None);
    }

    #[test]
    fn leaving_forgets_position() {
        let mut st = PointerState::default();
        st.moved(Vec2::new(1.0, 1.0));
        st.left();
        assert_eq!(st.button(true), None);
    }
}
