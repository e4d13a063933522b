/// Sees every raw chunk read from the master, before it is dispatched.
///
/// Called inline on the master read loop, so implementations must return
/// quickly and never block; hand work off to another task instead.
pub trait InputObserver: Send + Sync {
    fn observe(&self, data: &[u8]);
}

impl<F> InputObserver for F
where
    F: Fn(&[u8]) + Send + Sync,
{
    fn observe(&self, data: &[u8]) {
        self(data)
    }
}
