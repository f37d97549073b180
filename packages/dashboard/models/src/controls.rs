//! Presentation-agnostic input controls.
//!
//! A front end (terminal, web, notebook) owns its widgets; the dashboard
//! only needs to read their current values. Anything implementing
//! [`Selectable`] can drive a selection.

/// A control whose current value can be read.
pub trait Selectable<T> {
    /// The value the control currently shows.
    fn current(&self) -> T;
}

/// A single-choice list of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown<T> {
    options: Vec<T>,
    selected: usize,
}

impl<T: Clone + PartialEq> Dropdown<T> {
    /// Creates a dropdown showing its first option. Returns `None` when
    /// `options` is empty.
    #[must_use]
    pub fn new(options: Vec<T>) -> Option<Self> {
        if options.is_empty() {
            return None;
        }
        Some(Self {
            options,
            selected: 0,
        })
    }

    /// The available options in display order.
    #[must_use]
    pub fn options(&self) -> &[T] {
        &self.options
    }

    /// Selects `value`. Returns `false` and leaves the selection unchanged
    /// if `value` is not one of the options.
    pub fn select(&mut self, value: &T) -> bool {
        match self.options.iter().position(|option| option == value) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Replaces the options, keeping the current value if it is still
    /// offered and falling back to the first option otherwise. Returns
    /// `false` (and changes nothing) if `options` is empty.
    pub fn set_options(&mut self, options: Vec<T>) -> bool {
        if options.is_empty() {
            return false;
        }
        let current = self.options[self.selected].clone();
        self.selected = options
            .iter()
            .position(|option| *option == current)
            .unwrap_or(0);
        self.options = options;
        true
    }
}

impl<T: Clone> Selectable<T> for Dropdown<T> {
    fn current(&self) -> T {
        self.options[self.selected].clone()
    }
}

/// An integer slider over an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    min: usize,
    max: usize,
    value: usize,
}

impl Slider {
    /// Creates a slider. Bounds are swapped if given in the wrong order and
    /// `value` is clamped into them.
    #[must_use]
    pub fn new(min: usize, max: usize, value: usize) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            value: value.clamp(min, max),
        }
    }

    /// Moves the slider, clamping to its bounds. Returns the new value.
    pub fn set(&mut self, value: usize) -> usize {
        self.value = value.clamp(self.min, self.max);
        self.value
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }
}

impl Selectable<usize> for Slider {
    fn current(&self) -> usize {
        self.value
    }
}
