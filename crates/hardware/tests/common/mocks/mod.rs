//! Mock components.
