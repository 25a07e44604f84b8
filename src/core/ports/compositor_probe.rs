pub trait CompositorProbe: Send + Sync {
    fn is_compositor_active(&self) -> bool;
}
