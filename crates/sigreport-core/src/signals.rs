//! The set of signals the crash handler is registered for.

use nix::sys::signal::Signal;

/// Signals monitored by default, in registration order.
pub const MONITORED_SIGNALS: [Signal; 9] = [
    Signal::SIGHUP,
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGILL,
    Signal::SIGTRAP,
    Signal::SIGABRT,
    Signal::SIGFPE,
    Signal::SIGSEGV,
    Signal::SIGTERM,
];

/// Ordered, duplicate-free list of signals.
///
/// Built once before installation and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSet {
    signals: Vec<Signal>,
}

impl SignalSet {
    /// The default monitored set.
    pub fn monitored() -> Self {
        SignalSet {
            signals: MONITORED_SIGNALS.to_vec(),
        }
    }

    pub fn empty() -> Self {
        SignalSet {
            signals: Vec::new(),
        }
    }

    /// Add a signal at the end; duplicates keep their first position.
    pub fn insert(&mut self, signal: Signal) {
        if !self.contains(signal) {
            self.signals.push(signal);
        }
    }

    pub fn contains(&self, signal: Signal) -> bool {
        self.signals.contains(&signal)
    }

    pub fn iter(&self) -> impl Iterator<Item = Signal> + '_ {
        self.signals.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

impl Default for SignalSet {
    fn default() -> Self {
        Self::monitored()
    }
}

impl FromIterator<Signal> for SignalSet {
    fn from_iter<I: IntoIterator<Item = Signal>>(iter: I) -> Self {
        let mut set = SignalSet::empty();
        for signal in iter {
            set.insert(signal);
        }
        set
    }
}

/// Parse a signal name such as `SIGTERM`, `term` or a number such as `15`.
pub fn parse_signal(name: &str) -> Option<Signal> {
    let trimmed = name.trim();
    if let Ok(number) = trimmed.parse::<i32>() {
        return Signal::try_from(number).ok();
    }

    let upper = trimmed.to_ascii_uppercase();
    if upper.starts_with("SIG") {
        upper.parse().ok()
    } else {
        format!("SIG{}", upper).parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitored_order() {
        let numbers: Vec<i32> = SignalSet::monitored().iter().map(|s| s as i32).collect();
        assert_eq!(
            numbers,
            vec![
                libc::SIGHUP,
                libc::SIGINT,
                libc::SIGQUIT,
                libc::SIGILL,
                libc::SIGTRAP,
                libc::SIGABRT,
                libc::SIGFPE,
                libc::SIGSEGV,
                libc::SIGTERM,
            ]
        );
    }

    #[test]
    fn test_insert_dedups() {
        let set: SignalSet = [Signal::SIGTERM, Signal::SIGINT, Signal::SIGTERM]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Signal::SIGTERM, Signal::SIGINT]
        );
        assert!(!set.contains(Signal::SIGHUP));
        assert!(SignalSet::empty().is_empty());
    }

    #[test]
    fn test_parse_signal() {
        assert_eq!(parse_signal("SIGTERM"), Some(Signal::SIGTERM));
        assert_eq!(parse_signal("term"), Some(Signal::SIGTERM));
        assert_eq!(parse_signal(" SigHup "), Some(Signal::SIGHUP));
        assert_eq!(parse_signal("11"), Some(Signal::SIGSEGV));
        assert_eq!(parse_signal("SIGNOPE"), None);
        assert_eq!(parse_signal("0"), None);
        assert_eq!(parse_signal(""), None);
    }
}
