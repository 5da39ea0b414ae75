/// Side effects the engine asks of its surroundings.
pub trait Host {
    /// One-shot celebratory effect (confetti) after a correct answer or a
    /// completed lesson.
    fn celebrate(&mut self) {}

    fn set_fullscreen(&mut self, _enabled: bool) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl Host for NoopHost {}
