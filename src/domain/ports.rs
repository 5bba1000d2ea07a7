// Port for retrieving the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now_epoch_millis(&self) -> u64;
}
