use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

make_log_macro!(debug, "notifier");

/// Receives every effective brightness change, in order.
pub type BrightnessReceiver = UnboundedReceiver<f64>;

/// Holds at most one brightness change listener.
#[derive(Debug, Default)]
pub(crate) struct ChangeNotifier {
    sender: Option<UnboundedSender<f64>>,
}

impl ChangeNotifier {
    /// Replaces any existing listener; its receiver sees the stream end.
    pub fn subscribe(&mut self) -> BrightnessReceiver {
        let (tx, rx) = unbounded_channel();
        if self.sender.replace(tx).is_some() {
            debug!("replacing existing listener");
        }
        rx
    }

    pub fn unsubscribe(&mut self) {
        if self.sender.take().is_some() {
            debug!("listener removed");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.sender.is_some()
    }

    pub fn notify(&mut self, brightness: f64) {
        let Some(sender) = &self.sender else {
            return;
        };
        debug!("brightness changed to {brightness}");
        if sender.send(brightness).is_err() {
            debug!("listener went away");
            self.sender = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    #[test]
    fn test_notify_in_order() {
        let mut notifier = ChangeNotifier::default();
        let mut rx = notifier.subscribe();
        notifier.notify(0.1);
        notifier.notify(0.2);
        assert_eq!(rx.try_recv(), Ok(0.1));
        assert_eq!(rx.try_recv(), Ok(0.2));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_resubscribe_ends_old_stream() {
        let mut notifier = ChangeNotifier::default();
        let mut old = notifier.subscribe();
        let mut new = notifier.subscribe();
        notifier.notify(0.7);
        assert_eq!(old.try_recv(), Err(TryRecvError::Disconnected));
        assert_eq!(new.try_recv(), Ok(0.7));
    }

    #[test]
    fn test_unsubscribe() {
        let mut notifier = ChangeNotifier::default();
        let mut rx = notifier.subscribe();
        notifier.unsubscribe();
        notifier.notify(0.3);
        assert!(!notifier.is_subscribed());
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn test_dropped_receiver_clears_listener() {
        let mut notifier = ChangeNotifier::default();
        drop(notifier.subscribe());
        notifier.notify(0.3);
        assert!(!notifier.is_subscribed());
    }
}
