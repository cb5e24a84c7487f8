//! Session brightness state.

/// Which value currently drives the reported brightness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// No override, the system brightness is reported.
    Following,
    /// The user override masks the system brightness.
    Overridden,
}

/// Last known system brightness plus an optional user override.
///
/// Mutators return the value listeners should be told about, if any. They do
/// not talk to the display themselves, see
/// [`ScreenBrightness`](crate::ScreenBrightness) for that.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionState {
    system_brightness: f64,
    user_override: Option<f64>,
}

impl SessionState {
    pub fn new(system_brightness: f64) -> Self {
        Self {
            system_brightness,
            user_override: None,
        }
    }

    /// Record a new system brightness. Only visible while following.
    pub fn report_system_brightness_changed(&mut self, value: f64) -> Option<f64> {
        self.system_brightness = value;
        match self.user_override {
            Some(_) => None,
            None => Some(value),
        }
    }

    pub fn set_override(&mut self, value: f64) -> f64 {
        self.user_override = Some(value);
        value
    }

    pub fn reset_override(&mut self) -> f64 {
        self.user_override = None;
        self.system_brightness
    }

    pub fn current_effective_brightness(&self) -> f64 {
        self.user_override.unwrap_or(self.system_brightness)
    }

    pub fn system_brightness(&self) -> f64 {
        self.system_brightness
    }

    pub fn has_override(&self) -> bool {
        self.user_override.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.has_override() {
            SessionPhase::Overridden
        } else {
            SessionPhase::Following
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_round_trip() {
        let mut state = SessionState::new(0.5);
        assert!(!state.has_override());
        assert_eq!(state.phase(), SessionPhase::Following);

        assert_eq!(state.set_override(0.8), 0.8);
        assert!(state.has_override());
        assert_eq!(state.current_effective_brightness(), 0.8);
        assert_eq!(state.phase(), SessionPhase::Overridden);

        assert_eq!(state.reset_override(), 0.5);
        assert!(!state.has_override());
        assert_eq!(state.current_effective_brightness(), 0.5);
    }

    #[test]
    fn test_system_change_masked_by_override() {
        let mut state = SessionState::new(0.5);
        state.set_override(0.8);

        assert_eq!(state.report_system_brightness_changed(0.3), None);
        assert_eq!(state.current_effective_brightness(), 0.8);
        assert_eq!(state.system_brightness(), 0.3);

        assert_eq!(state.reset_override(), 0.3);
    }

    #[test]
    fn test_system_change_while_following() {
        let mut state = SessionState::new(0.5);
        assert_eq!(state.report_system_brightness_changed(0.3), Some(0.3));
        assert_eq!(state.current_effective_brightness(), 0.3);
    }

    #[test]
    fn test_override_replaced() {
        let mut state = SessionState::new(0.5);
        state.set_override(0.8);
        state.set_override(0.1);
        assert_eq!(state.current_effective_brightness(), 0.1);
        assert_eq!(state.phase(), SessionPhase::Overridden);
    }

    #[test]
    fn test_reset_while_following() {
        let mut state = SessionState::new(0.4);
        assert_eq!(state.reset_override(), 0.4);
        assert_eq!(state.phase(), SessionPhase::Following);
    }
}
