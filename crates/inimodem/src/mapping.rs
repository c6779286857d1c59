//! The mapping provider: the caller-supplied dispatch the parser consults for
//! every value.

use crate::context::Context;

/// Selects destinations for parsed values and optionally verifies them.
///
/// The parser invokes the provider at the start of every value
/// (`parsed = false`); the provider inspects [`Context::group`] and
/// [`Context::key`] and calls at most one binding verb. After a value has
/// been committed the provider is invoked again (`parsed = true`) and may
/// inspect the destination to enforce predicates the grammar cannot express.
/// Returning `false` in either phase aborts the parse with
/// [`ErrorKind::Rejected`](crate::ErrorKind::Rejected) at the current line.
///
/// Closures become providers through the [`mapping`] and [`verifying`]
/// adapters; types with more state implement the trait directly.
pub trait MappingProvider<'dst> {
    /// Selection (`parsed = false`) or verification (`parsed = true`) of one
    /// value.
    fn map(&mut self, ctx: &mut Context<'_, 'dst>, parsed: bool) -> bool;
}

/// A selection-only provider built by [`mapping`].
#[derive(Clone, Copy)]
pub struct Mapping<F>(F);

/// A two-phase provider built by [`verifying`].
#[derive(Clone, Copy)]
pub struct Verifying<F>(F);

/// Wraps a selection-only closure into a [`MappingProvider`].
///
/// The closure is called once per value, at value start; committed values are
/// accepted as-is.
pub fn mapping<'dst, F>(f: F) -> Mapping<F>
where
    F: FnMut(&mut Context<'_, 'dst>) -> bool,
{
    Mapping(f)
}

/// Wraps a two-phase closure into a [`MappingProvider`].
///
/// The closure is called once at value start (`parsed = false`) and once
/// after each committed value (`parsed = true`), to inspect the destination.
pub fn verifying<'dst, F>(f: F) -> Verifying<F>
where
    F: FnMut(&mut Context<'_, 'dst>, bool) -> bool,
{
    Verifying(f)
}

impl<'dst, F> MappingProvider<'dst> for Mapping<F>
where
    F: FnMut(&mut Context<'_, 'dst>) -> bool,
{
    fn map(&mut self, ctx: &mut Context<'_, 'dst>, parsed: bool) -> bool {
        if parsed {
            // no value verification
            true
        } else {
            (self.0)(ctx)
        }
    }
}

impl<'dst, F> MappingProvider<'dst> for Verifying<F>
where
    F: FnMut(&mut Context<'_, 'dst>, bool) -> bool,
{
    fn map(&mut self, ctx: &mut Context<'_, 'dst>, parsed: bool) -> bool {
        (self.0)(ctx, parsed)
    }
}
