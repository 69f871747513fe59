//! Shape metadata for a granted view.

/// Describes how a view's bytes may be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewLayout {
    /// Length in bytes.
    pub len: usize,

    /// Width of one element in bytes.
    pub item_size: usize,

    /// Whether writes are refused.
    pub readonly: bool,

    /// Whether the bytes form one unbroken linear span.
    pub contiguous: bool,
}

impl ViewLayout {
    /// Number of elements in the view.
    pub fn item_count(&self) -> usize {
        if self.item_size == 0 {
            0
        } else {
            self.len / self.item_size
        }
    }

    /// Returns true if the view is one contiguous span of single bytes.
    ///
    /// Consumers that index individual bytes must check this first.
    pub fn is_byte_contiguous(&self) -> bool {
        self.contiguous && self.item_size == 1
    }
}
