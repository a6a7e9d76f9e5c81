/// Hook for front-ends that want to show how far a conversion has got. The
/// converter only reports counts; rendering is up to the implementor.
pub trait ProgressObserver: Send + Sync {
    fn on_start(&self, posts: usize, comments: usize);
    fn on_post(&self);
    fn on_comment(&self);
    fn on_finish(&self) {}
}
