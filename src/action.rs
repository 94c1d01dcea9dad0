use crate::system::lifecycle::LifecycleAction;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    Up,
    Down,
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    /// Opens the confirmation dialog for the selected session.
    Request(LifecycleAction),
    Confirm,
    Cancel,
    ToggleHelp,
    Refresh,
    None,
}
