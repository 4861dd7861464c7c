// ABOUTME: Sealed trait pattern for the lifecycle interface.
// ABOUTME: Only the crate's adapters may implement ContainerLifecycle.

/// Sealed trait to prevent external implementations.
pub trait Sealed {}
