//! Step definitions for audit attribution scenarios.
