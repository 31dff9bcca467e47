// Discrete input records handed from the window to the game loop.

use std::collections::VecDeque;

use minifb::Key;

/// Mouse buttons the game distinguishes. Only `Primary` drives the spotlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The user asked the window manager to close the window.
    Closed,
    KeyPressed(Key),
    MouseButtonPressed { button: Button, x: i32, y: i32 },
    MouseMoved { x: i32, y: i32 },
}

/// What the window looked like at one poll.
#[derive(Debug, Clone, Default)]
pub struct WindowSnapshot {
    pub open: bool,
    /// Keys that went down since the previous window update, no repeats.
    pub keys_pressed: Vec<Key>,
    /// Pointer inside the window, or None when it is outside.
    pub mouse: Option<(i32, i32)>,
    /// Primary, secondary, middle.
    pub buttons_down: [bool; 3],
}

const BUTTONS: [Button; 3] = [Button::Primary, Button::Secondary, Button::Middle];

/// Remembers the previous snapshot and turns the differences into events.
#[derive(Debug, Default)]
pub struct InputTracker {
    close_reported: bool,
    buttons_were_down: [bool; 3],
    last_mouse: Option<(i32, i32)>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diff(&mut self, snap: &WindowSnapshot, out: &mut VecDeque<Event>) {
        if !snap.open && !self.close_reported {
            self.close_reported = true;
            out.push_back(Event::Closed);
        }

        out.extend(snap.keys_pressed.iter().map(|&key| Event::KeyPressed(key)));

        for (slot, button) in BUTTONS.into_iter().enumerate() {
            let down = snap.buttons_down[slot];
            let was_down = std::mem::replace(&mut self.buttons_were_down[slot], down);
            // A press outside the window has no position and is dropped.
            if let (true, false, Some((x, y))) = (down, was_down, snap.mouse) {
                out.push_back(Event::MouseButtonPressed { button, x, y });
            }
        }

        if let Some((x, y)) = snap.mouse {
            if self.last_mouse != Some((x, y)) {
                self.last_mouse = Some((x, y));
                out.push_back(Event::MouseMoved { x, y });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_at(x: i32, y: i32) -> WindowSnapshot {
        WindowSnapshot { open: true, mouse: Some((x, y)), ..WindowSnapshot::default() }
    }

    fn diff(tracker: &mut InputTracker, snap: &WindowSnapshot) -> Vec<Event> {
        let mut out = VecDeque::new();
        tracker.diff(snap, &mut out);
        out.into_iter().collect()
    }

    #[test]
    fn held_button_presses_once() {
        let mut t = InputTracker::new();
        let mut snap = open_at(10, 20);
        diff(&mut t, &snap);
        snap.buttons_down[0] = true;
        assert_eq!(
            diff(&mut t, &snap),
            vec![Event::MouseButtonPressed { button: Button::Primary, x: 10, y: 20 }]
        );
        assert!(diff(&mut t, &snap).is_empty());
        assert!(diff(&mut t, &snap).is_empty());
    }

    #[test]
    fn release_and_press_again_is_a_new_press() {
        let mut t = InputTracker::new();
        let mut snap = open_at(1, 1);
        snap.buttons_down[2] = true;
        assert!(diff(&mut t, &snap).contains(&Event::MouseButtonPressed { button: Button::Middle, x: 1, y: 1 }));
        snap.buttons_down[2] = false;
        assert!(diff(&mut t, &snap).is_empty());
        snap.buttons_down[2] = true;
        assert_eq!(
            diff(&mut t, &snap),
            vec![Event::MouseButtonPressed { button: Button::Middle, x: 1, y: 1 }]
        );
    }

    #[test]
    fn press_outside_window_is_dropped() {
        let mut t = InputTracker::new();
        let snap = WindowSnapshot { open: true, mouse: None, buttons_down: [true, false, false], ..WindowSnapshot::default() };
        assert!(diff(&mut t, &snap).is_empty());
    }

    #[test]
    fn unchanged_pointer_does_not_move() {
        let mut t = InputTracker::new();
        assert_eq!(diff(&mut t, &open_at(5, 6)), vec![Event::MouseMoved { x: 5, y: 6 }]);
        assert!(diff(&mut t, &open_at(5, 6)).is_empty());
        assert_eq!(diff(&mut t, &open_at(7, 6)), vec![Event::MouseMoved { x: 7, y: 6 }]);
    }

    #[test]
    fn closed_window_reports_once() {
        let mut t = InputTracker::new();
        let snap = WindowSnapshot::default();
        assert_eq!(diff(&mut t, &snap), vec![Event::Closed]);
        assert!(diff(&mut t, &snap).is_empty());
    }

    #[test]
    fn keys_come_out_in_order() {
        let mut t = InputTracker::new();
        let snap = WindowSnapshot { open: true, keys_pressed: vec![Key::L, Key::Escape], ..WindowSnapshot::default() };
        assert_eq!(diff(&mut t, &snap), vec![Event::KeyPressed(Key::L), Event::KeyPressed(Key::Escape)]);
    }
}
