/// Camera controller driven by pointer input.
pub trait Navigator {
    fn set_enabled(&mut self, enabled: bool);

    fn is_enabled(&self) -> bool;
}
