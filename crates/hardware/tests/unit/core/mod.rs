//! Tests for the fetch-path hardware blocks.
