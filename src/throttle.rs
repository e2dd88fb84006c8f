//! Throttling capability.
//!
//! A [`Throttle`] runs after authorization and before the handler. It only
//! answers yes or no; the dispatcher turns a yes into `THROTTLED` (503).
//!
//! The implementations here hold no state. A limiter that counts requests
//! must guard its counters itself; the dispatcher shares throttles between
//! concurrent requests without locking.

/// Per-binding switch forcing a throttle on or off.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Override {
    /// Use the throttle's own default.
    #[default]
    Inherit,
    On,
    Off,
}

/// Decides whether a request to `resource` should be rejected.
pub trait Throttle: Send + Sync + 'static {
    fn should_throttle(&self, resource: &str, mode: Override) -> bool;
}

/// Never throttles.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopThrottle;

impl Throttle for NoopThrottle {
    fn should_throttle(&self, _resource: &str, _mode: Override) -> bool {
        false
    }
}

/// All-or-nothing throttle: while enabled, every request is rejected.
///
/// Enabled unless the binding says [`Override::Off`]. With no override the
/// throttle fails closed.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrictThrottle;

impl Throttle for StrictThrottle {
    fn should_throttle(&self, _resource: &str, mode: Override) -> bool {
        // TODO: decide with the API owners whether Inherit should fail open;
        // until then an unconfigured binding rejects traffic.
        mode != Override::Off
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_never_throttles() {
        for mode in [Override::Inherit, Override::On, Override::Off] {
            assert!(!NoopThrottle.should_throttle("rest_example", mode));
        }
    }

    #[test]
    fn strict_fails_closed_unless_switched_off() {
        assert!(StrictThrottle.should_throttle("rest_example", Override::Inherit));
        assert!(StrictThrottle.should_throttle("rest_example", Override::On));
        assert!(!StrictThrottle.should_throttle("rest_example", Override::Off));
    }
}
