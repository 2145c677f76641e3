use tokio::sync::mpsc;

/// One attachment of a visibility observer to the last rendered photo.
///
/// `generation` increases every time the controller re-binds, so a watch
/// handed out for an earlier last element is recognisably stale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Watch {
    pub generation: u64,
    pub photo_id: String,
}

/// Reports "the watched element became visible" back to the controller.
///
/// Implementations decide what visible means (a viewport intersection, a
/// terminal reader pressing Enter, a test). The controller only attaches and
/// releases watches.
pub trait VisibilityObserver: Send {
    /// Starts watching the element described by `watch`.
    fn observe(&mut self, watch: Watch);

    /// Releases the current watch, if any.
    fn disconnect(&mut self);
}

/// Forwards every attached watch into a channel; whoever drains the channel
/// decides when the element counts as visible.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<Watch>,
    current: Option<Watch>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Watch>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, current: None }, rx)
    }

    pub fn current(&self) -> Option<&Watch> {
        self.current.as_ref()
    }
}

impl VisibilityObserver for ChannelObserver {
    fn observe(&mut self, watch: Watch) {
        self.current = Some(watch.clone());
        let _ = self.tx.send(watch);
    }

    fn disconnect(&mut self) {
        self.current = None;
    }
}
